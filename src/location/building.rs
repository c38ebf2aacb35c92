/// Building aliases in match precedence; the first group with a matching
/// alias wins.
///
/// Short aliases are prefixes of longer ones ("E I" of "E III"), so the order
/// of the groups must not change.
const BUILDING_ALIASES: &[(&str, &[&str])] = &[
    (
        "E3",
        &["2359", "E3", "E III", "Erweiterungsbau 3", "Erw.-Bau 3", "Erw.-bau III"],
    ),
    (
        "E2",
        &["2356", "E2", "E II", "Erweiterungsbau 2", "Erw.-Bau 2", "Erw.-bau II"],
    ),
    (
        "E1",
        &["2353", "E1", "E I", "Erweiterungsbau 1", "Erw.-Bau 1", "Erw.-bau I"],
    ),
    (
        "Hauptbau",
        &["2350", "HBau", "Hauptbau", "Hauptgebäude", "Altbau", "Sammelbau"],
    ),
];

/// Normalizes a raw building label from a directory page
///
/// The label is checked for case-sensitive substring matches against the
/// aliases of each known building (E3, E2, E1, Hauptbau, in that order).
/// Labels that match no alias are kept verbatim as `Sonstige (<label>)`.
///
/// # Examples
///
/// ```
/// use campus_atlas::location::normalize_building;
///
/// assert_eq!(normalize_building("2356 Erweiterungsbau 2"), "E2");
/// assert_eq!(normalize_building("Hauptgebäude"), "Hauptbau");
/// assert_eq!(normalize_building("2165"), "Sonstige (2165)");
/// ```
pub fn normalize_building(raw: &str) -> String {
    BUILDING_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| raw.contains(alias)))
        .map(|(building, _)| building.to_string())
        .unwrap_or_else(|| format!("Sonstige ({})", raw))
}
