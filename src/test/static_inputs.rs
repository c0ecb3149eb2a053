use crate::input::{InputError, PairMap, parse_node_list, read_node_list};
use std::fs;
use std::path::PathBuf;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ibgrove-inputs-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

#[test]
fn pair_map_resolves_upstream_back_to_downstream() {
    let map = PairMap::parse("node42, grove7\nnode43, grove8\n");
    assert_eq!(map.len(), 2);
    assert_eq!(map.reverse_lookup("grove7"), Some("node42"));
    assert_eq!(map.reverse_lookup("node42"), None);
}

#[test]
fn pair_map_later_lines_win_and_junk_is_ignored() {
    let map = PairMap::parse(
        "# SW 220\n\
         seqio1, grove1\n\
         ERROR: Failed to find uplink for seqio9\n\
         seqio2, grove1\n",
    );
    assert_eq!(map.len(), 1);
    assert_eq!(map.reverse_lookup("grove1"), Some("seqio2"));
}

#[test]
fn pair_map_splits_on_last_separator() {
    let map = PairMap::parse("a, b, c\n");
    assert_eq!(map.reverse_lookup("c"), Some("a, b"));
}

#[test]
fn node_list_trims_and_skips_blank_lines() {
    let nodes = parse_node_list("  seqio1 \n\n\tseqio2\n   \nseqio3");
    assert_eq!(nodes, vec!["seqio1", "seqio2", "seqio3"]);
}

#[test]
fn files_are_read_from_disk() {
    let list = temp_file("ions.txt", "seqio5\nseqio6\n");
    assert_eq!(read_node_list(&list).expect("read"), vec!["seqio5", "seqio6"]);

    let map = temp_file("optimal.txt", "seqio5, grove3\n");
    assert_eq!(
        PairMap::read(&map).expect("read").reverse_lookup("grove3"),
        Some("seqio5")
    );
}

#[test]
fn missing_file_reports_its_path() {
    let path = std::env::temp_dir().join("ibgrove-definitely-missing/none.txt");
    let err = read_node_list(&path).expect_err("missing file");
    let InputError::Io { path: reported, .. } = &err;
    assert_eq!(reported, &path);
    assert!(err.to_string().contains("none.txt"), "{err}");
}
