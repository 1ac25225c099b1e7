//! Property-based tests using proptest
//!
//! These tests check the identifier parser and field translators against
//! randomized inputs.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use gcf_inventory::manager::function::{
    make_last_deployed, make_location_and_id, make_readable_environment,
};
use gcf_inventory::manager::DisplayOffset;
use proptest::prelude::*;

fn arb_project() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{4,28}[a-z0-9]"
}

fn arb_location() -> impl Strategy<Value = String> {
    "[a-z]{2,12}-[a-z]{2,10}[0-9]{1,2}"
}

fn arb_function_id() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_-]{0,62}"
}

fn arb_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (1970i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(y, mo, d, h, mi, s)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap()
        },
    )
}

proptest! {
    /// Well-formed names always parse back to their parts
    #[test]
    fn well_formed_names_parse(
        project in arb_project(),
        location in arb_location(),
        function_id in arb_function_id(),
    ) {
        let name = format!("projects/{}/locations/{}/functions/{}", project, location, function_id);
        let parsed = make_location_and_id(&name, &project).unwrap();
        prop_assert_eq!(parsed, (location, function_id));
    }

    /// Names without the project marker never parse
    #[test]
    fn names_without_marker_fail(
        project in arb_project(),
        name in "[a-z0-9/-]{0,80}",
    ) {
        prop_assume!(!name.contains(&format!("projects/{}/locations/", project)));
        prop_assert!(make_location_and_id(&name, &project).is_err());
    }

    /// Extra or missing trailing segments are rejected
    #[test]
    fn wrong_segment_count_fails(
        project in arb_project(),
        location in arb_location(),
        segments in prop::collection::vec("[a-z0-9]{1,8}", 0..6),
    ) {
        prop_assume!(segments.len() != 2);
        let name = format!("projects/{}/locations/{}/{}", project, location, segments.join("/"));
        prop_assert!(make_location_and_id(&name, &project).is_err());
    }

    /// Only the three known environments translate
    #[test]
    fn unknown_environments_fail(environment in "[A-Z_0-9]{0,24}") {
        let known = ["GEN_1", "GEN_2", "ENVIRONMENT_UNSPECIFIED"];
        prop_assume!(!known.contains(&environment.as_str()));
        prop_assert!(make_readable_environment(&environment).is_err());
    }

    /// Display strings decode back to the input shifted by the offset
    #[test]
    fn last_deployed_shifts_by_offset(
        datetime in arb_datetime(),
        fraction in "[0-9]{1,9}",
        hours in -12i32..=14,
    ) {
        let input = format!("{}.{}Z", datetime.format("%Y-%m-%dT%H:%M:%S"), fraction);
        let offset = DisplayOffset::from_hours(hours).unwrap();

        let display = make_last_deployed(&input, offset).unwrap();
        let decoded = NaiveDateTime::parse_from_str(&display, "%m/%d, %Y,%I:%M:%S %p").unwrap();
        prop_assert_eq!(decoded, datetime + Duration::hours(i64::from(hours)));
    }

    /// Timestamps without fractional seconds are rejected
    #[test]
    fn last_deployed_requires_fraction(datetime in arb_datetime()) {
        let input = datetime.format("%Y-%m-%dT%H:%M:%S").to_string();
        prop_assert!(make_last_deployed(&input, DisplayOffset::KST).is_err());
    }
}
