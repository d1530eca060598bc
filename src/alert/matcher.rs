//! Pure relevance matching of active alerts against a region set.

use crate::alert::ActiveAlert;

/// Returns the alerts relevant to a subscriber with the given region set,
/// preserving input order.
///
/// An alert is relevant when its location label contains at least one of the
/// region names as a literal, case-sensitive substring. An empty region set
/// matches every alert: a subscriber who has not chosen a region still gets
/// the nationwide picture on demand.
///
/// The containment rule is deliberately loose and is the primary source of
/// false negatives: a catalog name like "Київська область" is not a
/// substring of the source label "м. Київ", so no semantic equivalence is
/// ever applied.
pub fn relevant_alerts<'a>(alerts: &'a [ActiveAlert], regions: &[String]) -> Vec<&'a ActiveAlert> {
    alerts
        .iter()
        .filter(|alert| {
            regions.is_empty()
                || regions
                    .iter()
                    .any(|region| alert.location_title.contains(region.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(location: &str) -> ActiveAlert {
        ActiveAlert {
            location_title: location.to_string(),
            location_uid: None,
            started_at: None,
        }
    }

    #[test]
    fn test_keeps_only_contained_regions_in_input_order() {
        let alerts = vec![
            alert("Харківська область"),
            alert("Сумська область"),
            alert("Київська область"),
        ];
        let regions = vec![
            "Київська область".to_string(),
            "Харківська область".to_string(),
        ];

        let relevant = relevant_alerts(&alerts, &regions);
        let titles: Vec<&str> = relevant.iter().map(|a| a.location_title.as_str()).collect();
        assert_eq!(titles, vec!["Харківська область", "Київська область"]);
    }

    #[test]
    fn test_empty_region_set_matches_everything() {
        let alerts = vec![alert("Сумська область"), alert("м. Київ")];
        let relevant = relevant_alerts(&alerts, &[]);
        assert_eq!(relevant.len(), 2);
    }

    #[test]
    fn test_empty_alert_list_yields_empty() {
        let regions = vec!["Сумська область".to_string()];
        assert!(relevant_alerts(&[], &regions).is_empty());
    }

    #[test]
    fn test_strictly_substring_no_geographic_equivalence() {
        // "Київська область" is not a substring of "м. Київ": no match, even
        // though the oblast surrounds the city.
        let alerts = vec![alert("м. Київ")];
        let regions = vec!["Київська область".to_string()];
        assert!(relevant_alerts(&alerts, &regions).is_empty());

        // The reverse direction over-matches: "м. Київ" is contained in a
        // longer label mentioning the city.
        let alerts = vec![alert("Київська область та м. Київ")];
        let regions = vec!["м. Київ".to_string()];
        assert_eq!(relevant_alerts(&alerts, &regions).len(), 1);
    }

    #[test]
    fn test_case_sensitive() {
        let alerts = vec![alert("СУМСЬКА ОБЛАСТЬ")];
        let regions = vec!["Сумська область".to_string()];
        assert!(relevant_alerts(&alerts, &regions).is_empty());
    }
}
