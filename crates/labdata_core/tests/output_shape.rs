use labdata_core::{assemble, PersonRecord, ProjectRecord, RawPublication};
use serde_json::Value;

fn snapshot() -> Value {
    let roster = vec![PersonRecord::new("asmith", "Alexander Smith").with_aliases(["A. Smith"])];
    let projects = vec![ProjectRecord::new("robotics", "Robotics")];
    let raw = vec![RawPublication::new()
        .with("bib_id", "smith2020")
        .with("title", "Forks")
        .with("author", "A. Smith and Q. Random")
        .with("year", 2020)
        .with("venue", "ICRA")
        .with("category", "Conference Papers")
        .with("doi", "10.1/abc")
        .with("eprint", "2101.00001")
        .with("abstract", "Abs")
        .with("ENTRYTYPE", "inproceedings")
        .with("project", "robotics, ghostproj")];
    let data = assemble(&raw, &roster, &projects).expect("assemble");
    serde_json::to_value(&data).expect("serialize snapshot")
}

#[test]
fn top_level_collections_are_stable() {
    let json = snapshot();
    let keys: Vec<&str> = json
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    for key in ["publications", "people", "projects", "collaborators", "warnings"] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert_eq!(keys.len(), 5);
}

#[test]
fn entity_fields_use_contract_names() {
    let json = snapshot();

    let publication = &json["publications"][0];
    assert_eq!(publication["bib_id"], "smith2020");
    assert_eq!(publication["year"], 2020);
    assert_eq!(publication["authors"][0]["display_name"], "A. Smith");
    assert_eq!(publication["authors"][0]["person_id"], "asmith");
    assert_eq!(publication["authors"][1]["person_id"], Value::Null);
    assert_eq!(publication["project_ids"], serde_json::json!(["robotics"]));
    assert_eq!(publication["doi_url"], "https://doi.org/10.1/abc");
    assert_eq!(publication["arxiv_url"], "https://arxiv.org/abs/2101.00001");
    assert_eq!(publication["abstract"], "Abs");
    assert_eq!(publication["entry_type"], "inproceedings");
    assert_eq!(publication["pdf_url"], Value::Null);
    assert!(publication.get("abstract_text").is_none());

    let person = &json["people"][0];
    assert_eq!(person["id"], "asmith");
    assert_eq!(person["status"], "current");
    assert_eq!(person["publication_ids"], serde_json::json!(["smith2020"]));
    assert_eq!(person["publication_count"], 1);
    assert!(person.get("email").is_none());

    let project = &json["projects"][0];
    assert_eq!(project["status"], "active");
    assert_eq!(project["people_ids"], serde_json::json!(["asmith"]));

    assert_eq!(json["collaborators"][0]["display_name"], "Q. Random");

    let warning = &json["warnings"][0];
    assert_eq!(warning["kind"], "reference_error");
    assert_eq!(warning["context"], "smith2020");
}
