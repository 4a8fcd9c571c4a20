use ontocsv_ingest::example::{rank_rows, representative_row, DEFAULT_EXAMPLE_RANK};
use ontocsv_ingest::extract::{extract, local_id, OWL_THING_IRI};
use ontocsv_ingest::{MappingConfig, Table};
use proptest::prelude::*;

fn token() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_]{1,12}").unwrap()
}

fn base_iri() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("http://purl.obolibrary.org/obo".to_string()),
        Just("http://onto.org".to_string()),
        Just("https://example.com/ontologies/v1.2".to_string()),
    ]
}

fn config() -> MappingConfig {
    MappingConfig::new("src.csv", "ONT", "nodes.csv", "a-b-c.csv", vec![]).unwrap()
}

fn source(rows: Vec<(String, String)>) -> Table {
    Table::with_rows(
        ["Preferred Label", "Synonyms", "Definitions", "Class ID", "Parents"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        rows.into_iter()
            .map(|(url, parents)| vec!["label".into(), String::new(), String::new(), url, parents])
            .collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn local_id_ignores_separator_style(base in base_iri(), local in token()) {
        let path_style = format!("{base}/{local}");
        let fragment_style = format!("{base}#{local}");
        prop_assert_eq!(local_id(&path_style), Some(local.as_str()));
        prop_assert_eq!(local_id(&fragment_style), Some(local.as_str()));
    }

    #[test]
    fn parents_fan_out_one_edge_each(
        base in base_iri(),
        child in token(),
        parents in proptest::collection::vec(token(), 0..6),
    ) {
        let parent_list = parents
            .iter()
            .map(|p| format!("{base}/{p}"))
            .collect::<Vec<_>>()
            .join("|");
        let table = source(vec![(format!("{base}/{child}"), parent_list)]);
        let out = extract(&table, &config()).unwrap();

        prop_assert_eq!(out.edges.len(), parents.len());
        let from = format!("ONT:{child}");
        prop_assert!(out.edges.iter().all(|e| e.from == from));
        for (edge, parent) in out.edges.iter().zip(&parents) {
            prop_assert_eq!(&edge.to, &format!("ONT:{parent}"));
        }
    }

    #[test]
    fn root_node_added_at_most_once(flags in proptest::collection::vec(any::<bool>(), 1..20)) {
        let rows = flags
            .iter()
            .enumerate()
            .map(|(i, top)| {
                let parents = if *top { OWL_THING_IRI.to_string() } else { String::new() };
                (format!("http://onto.org/C{i}"), parents)
            })
            .collect();
        let out = extract(&source(rows), &config()).unwrap();

        let any_top = flags.iter().any(|f| *f);
        prop_assert_eq!(out.root_injected, any_top);
        prop_assert_eq!(out.nodes.len(), flags.len() + usize::from(any_top));
        let roots = out.nodes.column_values("id").unwrap().filter(|id| *id == "ONT:root").count();
        prop_assert_eq!(roots, usize::from(any_top));
    }

    #[test]
    fn small_tables_pick_the_last_ranked_row(
        cells in proptest::collection::vec(("[a-z|]{0,8}", "[a-z]{0,8}"), 1..DEFAULT_EXAMPLE_RANK),
    ) {
        let table = Table::with_rows(
            vec!["name".into(), "synonyms".into()],
            cells.into_iter().map(|(a, b)| vec![b, a]).collect(),
        );
        let ranked = rank_rows(&table, Some("synonyms"));
        let picked = representative_row(&table, Some("synonyms"), DEFAULT_EXAMPLE_RANK);
        prop_assert_eq!(picked, ranked.last().map(|r| r.0));
        prop_assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }
}
