//! Tests for the provider-neutral record-management types.

use std::net::Ipv4Addr;

use super::types::{names_match, strip_id_prefix};
use super::{ChangeRef, ChangeRequest, ChangeState, RecordSnapshot};

fn snapshot(values: &[Ipv4Addr]) -> RecordSnapshot {
    RecordSnapshot {
        name: "host.example.com.".to_string(),
        ttl: 300,
        values: values.to_vec(),
    }
}

mod change_request {
    use super::*;

    #[test]
    fn replace_deletes_full_value_set() {
        let old = [Ipv4Addr::new(1, 2, 3, 4), Ipv4Addr::new(9, 9, 9, 9)];
        let new_ip = Ipv4Addr::new(5, 6, 7, 8);

        let request = ChangeRequest::replace(&snapshot(&old), new_ip);

        assert_eq!(request.delete_values, old);
        assert_eq!(request.create_value, new_ip);
    }

    #[test]
    fn replace_keeps_name_and_ttl() {
        let record = snapshot(&[Ipv4Addr::new(1, 2, 3, 4)]);

        let request = ChangeRequest::replace(&record, Ipv4Addr::new(5, 6, 7, 8));

        assert_eq!(request.name, record.name);
        assert_eq!(request.ttl, record.ttl);
    }
}

mod change_state {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        assert_eq!(ChangeState::parse("PENDING"), ChangeState::Pending);
        assert_eq!(ChangeState::parse("INSYNC"), ChangeState::InSync);
    }

    #[test]
    fn unknown_status_is_preserved() {
        let state = ChangeState::parse("THROTTLED");
        assert_eq!(state, ChangeState::Other("THROTTLED".to_string()));
        assert!(state.is_terminal());
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(ChangeState::Pending.is_pending());
        assert!(!ChangeState::Pending.is_terminal());
        assert!(ChangeState::InSync.is_terminal());
    }

    #[test]
    fn display_round_trips_raw_status() {
        assert_eq!(ChangeState::Pending.to_string(), "PENDING");
        assert_eq!(ChangeState::InSync.to_string(), "INSYNC");
        assert_eq!(ChangeState::Other("X".to_string()).to_string(), "X");
    }
}

mod identifiers {
    use super::*;

    #[test]
    fn change_ref_strips_resource_prefix() {
        let change = ChangeRef::new("/change/C2682N5HXP0BZ4", ChangeState::Pending);
        assert_eq!(change.id, "C2682N5HXP0BZ4");
    }

    #[test]
    fn bare_id_is_unchanged() {
        let change = ChangeRef::new("C2682N5HXP0BZ4", ChangeState::Pending);
        assert_eq!(change.id, "C2682N5HXP0BZ4");
    }

    #[test]
    fn zone_prefix_is_stripped() {
        assert_eq!(strip_id_prefix("/hostedzone/Z119WBBTVP5WFX"), "Z119WBBTVP5WFX");
    }
}

mod record_names {
    use super::*;

    #[test]
    fn trailing_dot_is_ignored() {
        assert!(names_match("host.example.com.", "host.example.com"));
    }

    #[test]
    fn comparison_is_case_insensitive() {
        assert!(names_match("HOST.Example.COM.", "host.example.com"));
    }

    #[test]
    fn different_names_do_not_match() {
        assert!(!names_match("other.example.com.", "host.example.com"));
    }
}
