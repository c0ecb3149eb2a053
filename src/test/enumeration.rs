use crate::parse::{RoutePatterns, cluster_lids, route_section, switch_lids, uplink_nodes_on_port};

const SAQUERY_NR: &str = "\
NodeRecord dump:
\t\tlid.....................0x1
\t\treserved................0x0
\t\tbase_version............0x1
\t\tNodeDescription.........grove1 HCA-1
NodeRecord dump:
\t\tlid.....................0x5
\t\tNodeDescription.........seqio3 HCA-1
NodeRecord dump:
\t\tlid.....................0x11
\t\tNodeDescription.........grove2 HCA-1
";

const IBSWITCHES: &str = "\
Switch\t: 0x0002c90200401234 ports 36 \"MF0;sw01:IS5030/U1\" enhanced port 0 lid 220 lmc 0
Switch\t: 0x0002c90200405678 ports 36 \"MF0;sw02:IS5030/U1\" enhanced port 0 lid 55 lmc 0
";

const DUMP_LFTS: &str = "\
Unicast lids [0x0-0x5f] of switch Lid 220 guid 0x0002c90200401234 (MF0;sw01:IS5030/U1):
  Lid  Out   Destination
       Port     Info
0x0001 013 : (Channel Adapter portguid 0x1: 'grove1 HCA-1')
0x0002 014 : (Channel Adapter portguid 0x2: 'grove2 HCA-1')
0x0003 013 : (Channel Adapter portguid 0x3: 'grove3 HCA-1')
3 valid lids dumped
Unicast lids [0x0-0x5f] of switch Lid 55 guid 0x0002c90200405678 (MF0;sw02:IS5030/U1):
  Lid  Out   Destination
       Port     Info
0x0001 013 : (Channel Adapter portguid 0x1: 'grove4 HCA-1')
1 valid lids dumped
";

#[test]
fn cluster_lids_pick_records_by_description_prefix() {
    assert_eq!(cluster_lids(SAQUERY_NR, "grove"), vec![1, 17]);
    assert_eq!(cluster_lids(SAQUERY_NR, "seqio"), vec![5]);
    assert!(cluster_lids(SAQUERY_NR, "nope").is_empty());
}

#[test]
fn description_without_preceding_lid_is_skipped() {
    let text = "\t\tNodeDescription.........grove1 HCA-1\n";
    assert!(cluster_lids(text, "grove").is_empty());
}

#[test]
fn switch_lids_are_read_from_enumeration() {
    assert_eq!(switch_lids(IBSWITCHES), vec![220, 55]);
    assert!(switch_lids("no switches here\n").is_empty());
}

#[test]
fn route_section_stops_at_the_next_switch() {
    let section = route_section(DUMP_LFTS, 220);
    assert_eq!(section.len(), 7);
    assert!(section[0].contains("Lid 220 guid"));
    assert_eq!(section[6], "3 valid lids dumped");

    assert_eq!(route_section(DUMP_LFTS, 55).len(), 5);
    assert!(route_section(DUMP_LFTS, 99).is_empty());
}

#[test]
fn uplink_nodes_on_port_filters_one_switch() {
    let patterns = RoutePatterns::new("grove", None).expect("patterns");
    assert_eq!(
        uplink_nodes_on_port(DUMP_LFTS, 220, 13, &patterns),
        vec!["grove1", "grove3"]
    );
    assert_eq!(uplink_nodes_on_port(DUMP_LFTS, 55, 13, &patterns), vec!["grove4"]);
    assert!(uplink_nodes_on_port(DUMP_LFTS, 220, 15, &patterns).is_empty());
}
