use labdata_core::{
    assemble_from_config, load_projects, load_publications, load_roster, ConfigError, LabConfig,
    PersonStatus, ProjectStatus, ValidationReport, WarningKind,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PEOPLE_YAML: &str = r#"
- id: asmith
  name: Alexander Smith
  aliases: ["A. Smith", "Alex Smith"]
  role: phd
- id: jdoe
  name: Jane Doe
  aliases: ["J. Doe"]
  status: alumni
  end_year: 2022
  thesis_title: Learning to Feed
"#;

const PROJECTS_YAML: &str = r#"
- id: robotics
  title: Robotics
- id: feeding
  title: Robot-Assisted Feeding
  status: archived
"#;

const JOURNAL_YAML: &str = r#"
- ID: smith2020
  title: Feeding with Forks
  author: Smith, Alexander and Doe, Jane
  year: 2020
  journal: IJRR
  project: feeding
- bib_id: weird
  title: [not, a, scalar]
  author: A. Smith
  year: 2020
- bib_id: doe2021
  title: Spoons
  author: J. Doe and Q. Random
  year: "2021"
  category: Workshop Papers
  project: robotics, ghostproj
"#;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write fixture");
}

fn lab_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), "people.yaml", PEOPLE_YAML);
    write(dir.path(), "projects.yaml", PROJECTS_YAML);
    write(dir.path(), "journal.yaml", JOURNAL_YAML);
    write(
        dir.path(),
        "lab.yaml",
        "people_file: people.yaml\nprojects_file: projects.yaml\npublication_files:\n  - path: journal.yaml\n    category: Journal Papers\n",
    );
    dir
}

#[test]
fn roster_and_projects_load_with_defaults() {
    let dir = lab_dir();
    let people = load_roster(dir.path().join("people.yaml")).expect("load roster");
    assert_eq!(people.len(), 2);
    assert_eq!(people[0].status, PersonStatus::Current);
    assert_eq!(people[1].status, PersonStatus::Alumni);
    assert_eq!(people[1].end_year, Some(2022));

    let projects = load_projects(dir.path().join("projects.yaml")).expect("load projects");
    assert_eq!(projects[0].status, ProjectStatus::Active);
    assert_eq!(projects[1].status, ProjectStatus::Archived);
}

#[test]
fn missing_roster_file_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_roster(dir.path().join("people.yaml")).expect_err("missing file");
    assert!(matches!(err, ConfigError::Missing(_)));
}

#[test]
fn structurally_invalid_roster_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), "map.yaml", "id: asmith\nname: Alexander Smith\n");
    assert!(matches!(
        load_roster(dir.path().join("map.yaml")),
        Err(ConfigError::NotAList(_))
    ));

    write(dir.path(), "status.yaml", "- id: asmith\n  name: A\n  status: visiting\n");
    assert!(matches!(
        load_roster(dir.path().join("status.yaml")),
        Err(ConfigError::InvalidRecord { kind: "person", position: 0, .. })
    ));

    write(dir.path(), "broken.yaml", "- id: [unterminated\n");
    assert!(matches!(
        load_projects(dir.path().join("broken.yaml")),
        Err(ConfigError::Malformed { .. })
    ));
}

#[test]
fn undecodable_publication_is_a_parse_warning() {
    let dir = lab_dir();
    let batch = load_publications(dir.path().join("journal.yaml"), Some("Journal Papers"))
        .expect("load publications");
    assert_eq!(batch.records.len(), 2);
    assert_eq!(batch.warnings.len(), 1);
    assert_eq!(batch.warnings[0].kind, WarningKind::ParseError);
    assert_eq!(batch.warnings[0].context, "weird");

    assert_eq!(batch.records[0].text("category").as_deref(), Some("Journal Papers"));
    assert_eq!(batch.records[1].text("category").as_deref(), Some("Workshop Papers"));
}

#[test]
fn config_drives_full_assembly() {
    let dir = lab_dir();
    let config = LabConfig::from_yaml_file(dir.path().join("lab.yaml")).expect("config");
    let result = assemble_from_config(&config).expect("assemble from config");
    let data = &result.data;

    let smith2020 = data.publication("smith2020").expect("smith2020 present");
    assert_eq!(smith2020.venue, "IJRR");
    assert_eq!(smith2020.authors[0].display_name, "Alexander Smith");
    assert_eq!(smith2020.authors[0].person_id.as_deref(), Some("asmith"));
    assert_eq!(smith2020.authors[1].person_id.as_deref(), Some("jdoe"));

    assert_eq!(data.person("jdoe").expect("jdoe").publication_ids(), &["doe2021", "smith2020"]);
    assert_eq!(data.collaborators().len(), 1);
    assert_eq!(data.warnings()[0].kind, WarningKind::ParseError);

    let report = ValidationReport::new(&result);
    assert_eq!(report.unknown_projects, vec!["ghostproj"]);
    assert_eq!(report.unresolved_authors, vec!["Q. Random"]);
    assert!(!report.passed());
}

#[test]
fn config_with_missing_roster_aborts_before_publications() {
    let dir = lab_dir();
    fs::remove_file(dir.path().join("people.yaml")).expect("remove roster");
    fs::remove_file(dir.path().join("journal.yaml")).expect("remove publications");

    let config = LabConfig::from_yaml_file(dir.path().join("lab.yaml")).expect("config");
    let err = assemble_from_config(&config).expect_err("missing roster is fatal");
    match err {
        ConfigError::Missing(path) => assert!(path.ends_with("people.yaml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_optional_fields_keep_the_record() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "sparse.yaml",
        "- bib_id: smith2020\n  title: Forks\n  author: A. Smith\n  year: 2020\n  note:\n  doi: ~\n  selected: false\n",
    );
    let batch = load_publications(dir.path().join("sparse.yaml"), None).expect("load publications");
    assert!(batch.warnings.is_empty(), "unexpected warnings: {:?}", batch.warnings);
    assert_eq!(batch.records.len(), 1);

    let roster = vec![labdata_core::PersonRecord::new("asmith", "A. Smith")];
    let data = labdata_core::assemble(&batch.records, &roster, &[]).expect("assemble");
    let publication = data.publication("smith2020").expect("publication kept");
    assert_eq!(publication.note, None);
    assert_eq!(publication.doi_url, None);
    assert_eq!(data.person("asmith").expect("asmith").publication_ids(), &["smith2020"]);
}

#[test]
fn pdf_base_url_links_every_entry_with_an_id() {
    let dir = lab_dir();
    write(
        dir.path(),
        "lab.yaml",
        "people_file: people.yaml\nprojects_file: projects.yaml\npdf_base_url: https://lab.edu/pdfs\npublication_files:\n  - path: journal.yaml\n",
    );
    let config = LabConfig::from_yaml_file(dir.path().join("lab.yaml")).expect("config");
    assert_eq!(config.pdf_base_url.as_deref(), Some("https://lab.edu/pdfs"));

    let result = assemble_from_config(&config).expect("assemble from config");
    let smith2020 = result.data.publication("smith2020").expect("smith2020 present");
    assert_eq!(smith2020.pdf_url.as_deref(), Some("https://lab.edu/pdfs/smith2020.pdf"));
    let doe2021 = result.data.publication("doe2021").expect("doe2021 present");
    assert_eq!(doe2021.pdf_url.as_deref(), Some("https://lab.edu/pdfs/doe2021.pdf"));
}
