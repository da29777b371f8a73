use insta::{assert_json_snapshot, assert_snapshot};
use recset::{args, Arg, Collection, Query, UniqueBy};
use serde_json::json;

fn catalog() -> Collection {
    Collection::from_value(json!([
        {"title": "Dune", "year": 1965, "genre": "sf", "rating": 4.3},
        {"title": "Emma", "year": 1815, "genre": "classic", "rating": 4.2},
        {"title": "Neuromancer", "year": 1984, "genre": "sf", "rating": 3.9},
        {"title": "Persuasion", "year": 1817, "genre": "classic", "rating": 4.1},
        {"title": "Dune", "year": 1965, "genre": "sf", "rating": 4.3},
    ]))
    .unwrap()
}

#[test]
fn test_snapshots_resolved_union() {
    let result = catalog()
        .query()
        .and_where(args!["year", ">=", 1980])
        .or_where([Arg::eq("title", "Emma"), Arg::eq("title", "Dune")])
        .get()
        .unwrap();

    assert_json_snapshot!(result, @r#"
    [
      {
        "title": "Neuromancer",
        "year": 1984,
        "genre": "sf",
        "rating": 3.9
      },
      {
        "title": "Dune",
        "year": 1965,
        "genre": "sf",
        "rating": 4.3
      },
      {
        "title": "Emma",
        "year": 1815,
        "genre": "classic",
        "rating": 4.2
      },
      {
        "title": "Dune",
        "year": 1965,
        "genre": "sf",
        "rating": 4.3
      }
    ]
    "#);
}

#[test]
fn test_snapshots_grouped_titles() {
    let grouped = catalog()
        .unique(UniqueBy::Serialized)
        .unwrap()
        .group_by("genre")
        .unwrap();
    let titles = grouped.map(|bucket, _| {
        let names: Vec<_> = bucket
            .as_array()
            .into_iter()
            .flatten()
            .map(|book| book["title"].clone())
            .collect();
        json!(names)
    });

    assert_json_snapshot!(titles, @r#"
    {
      "sf": [
        "Dune",
        "Neuromancer"
      ],
      "classic": [
        "Emma",
        "Persuasion"
      ]
    }
    "#);
}

#[test]
fn test_snapshots_error_messages() {
    let missing = Query::new()
        .and_where([Arg::eq("author", "Herbert")])
        .resolve(&catalog())
        .unwrap_err();
    let shape = Query::new()
        .and_where([Arg::Tuple(vec![json!("year"), json!(1965)])])
        .resolve(&catalog())
        .unwrap_err();
    let grouping = catalog()
        .map(|book, _| json!({"tags": [book["genre"].clone()]}))
        .group_by("tags")
        .unwrap_err();

    let output = format!("{missing}\n{shape}\n{grouping}");
    assert_snapshot!(output, @r#"
    field not found: author
    unsupported term shape: ["year",1965]
    field 'tags' holds a nested value and cannot be used as a group key
    "#);
}
