use std::collections::HashMap;

use reading_client::domain::Reading;
use serde::Serialize;

use super::bucket::Totals;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceSummary {
    pub appliance_name: String,
    pub total_units: f64,
    pub total_cost: f64,
}

/// Sum units and cost per appliance name, largest consumer first.
///
/// Names are compared exactly (case-sensitive, untrimmed). Appliances with
/// equal totals keep the order in which they were first seen.
pub fn by_appliance(readings: &[Reading]) -> Vec<ApplianceSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Totals)> = Vec::new();

    for reading in readings {
        let name = reading.appliance_name.as_str();
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push((name, Totals::default()));
            groups.len() - 1
        });
        groups[slot].1.add(reading);
    }

    // Stable sort keeps first-seen order among ties.
    groups.sort_by(|a, b| b.1.units.total_cmp(&a.1.units));

    groups
        .into_iter()
        .map(|(name, totals)| ApplianceSummary {
            appliance_name: name.to_string(),
            total_units: totals.units,
            total_cost: totals.cost,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reading_client::domain::OwnerId;

    fn reading(appliance: &str, units: f64) -> Reading {
        Reading {
            id: 0,
            owner_id: OwnerId::new("u-1"),
            date: None,
            appliance_name: appliance.to_string(),
            units,
            cost_per_unit: 0.5,
            total_cost: units * 0.5,
        }
    }

    #[test]
    fn highest_consumer_first() {
        let r = vec![reading("Fridge", 10.0), reading("AC", 30.0), reading("Fridge", 5.0)];

        let summary = by_appliance(&r);
        assert_eq!(
            summary,
            vec![
                ApplianceSummary { appliance_name: "AC".into(), total_units: 30.0, total_cost: 15.0 },
                ApplianceSummary { appliance_name: "Fridge".into(), total_units: 15.0, total_cost: 7.5 },
            ]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let r = vec![
            reading("TV", 4.0),
            reading("Kettle", 4.0),
            reading("Heater", 9.0),
            reading("Lamp", 4.0),
        ];

        let names: Vec<String> = by_appliance(&r).into_iter().map(|s| s.appliance_name).collect();
        assert_eq!(names, vec!["Heater", "TV", "Kettle", "Lamp"]);
    }

    #[test]
    fn names_are_case_and_whitespace_sensitive() {
        let r = vec![reading("AC", 1.0), reading("ac", 1.0), reading("AC ", 1.0)];
        assert_eq!(by_appliance(&r).len(), 3);
    }

    #[test]
    fn totals_sum_to_overall_units() {
        let r = vec![
            reading("AC", 1.5),
            reading("Fridge", 2.25),
            reading("AC", 3.0),
            reading("Washer", 0.25),
        ];
        let total: f64 = by_appliance(&r).iter().map(|s| s.total_units).sum();
        assert_eq!(total, 7.0);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let r = vec![reading("B", 2.0), reading("A", 2.0), reading("C", 1.0)];
        assert_eq!(by_appliance(&r), by_appliance(&r));
    }
}
