//! Snapshot documents: lenient import, export and edits
//!
//! Imported documents are normalized so the engine only ever sees clamped,
//! consistent data. Edits keep cross references valid: removing a person
//! frees their weeks, removing a category moves its people to the first
//! remaining one.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

use crate::calendar::build_weeks_for_year;
use crate::coerce::{self, clamp, clamp_year, number_from_value, MAX_PERCENT_FACTOR};
use crate::config::Defaults;
use crate::error::{Error, Result};
use crate::models::{Category, Charge, ChargeKind, Participant, Person, Snapshot, Week};

/// Import a snapshot document from JSON text
pub fn import_document(json: &str, defaults: &Defaults, current_year: i32) -> Result<Snapshot> {
    let value: Value =
        serde_json::from_str(json).map_err(|_| Error::InvalidData("invalid file".into()))?;
    import_value(value, defaults, current_year)
}

/// Import a snapshot document from an already parsed JSON value
pub fn import_value(value: Value, defaults: &Defaults, current_year: i32) -> Result<Snapshot> {
    let Value::Object(fields) = &value else {
        return Err(Error::InvalidData("invalid file".into()));
    };

    let year = clamp_year(
        fields
            .get("year")
            .and_then(number_from_value)
            .map_or(current_year, |y| y.trunc() as i32),
    );
    let has_categories = fields.get("categories").is_some_and(Value::is_array);
    let has_people = fields.get("people").is_some_and(Value::is_array);

    let doc: Snapshot =
        serde_json::from_value(value).map_err(|_| Error::InvalidData("invalid file".into()))?;

    let participants = doc
        .participants
        .into_iter()
        .map(|p| Participant {
            ownership_percent: clamp(p.ownership_percent, 0.0, 100.0),
            loan_cost: clamp(p.loan_cost, 0.0, f64::MAX),
            ..p
        })
        .collect::<Vec<_>>();

    let charges = doc
        .charges
        .into_iter()
        .map(|c| Charge {
            years: c.years.filter(|y| *y > 0.0),
            ..c
        })
        .collect();

    let categories: Vec<Category> = if has_categories {
        doc.categories
            .into_iter()
            .map(|c| Category {
                price_factor_percent: clamp(c.price_factor_percent, 0.0, MAX_PERCENT_FACTOR),
                ..c
            })
            .collect()
    } else {
        defaults.categories.clone()
    };
    let first_category = categories.first().map(|c| c.name.clone());

    let people = if has_people {
        doc.people
            .into_iter()
            .map(|p| Person {
                category_name: p.category_name.or_else(|| first_category.clone()),
                ..p
            })
            .collect()
    } else {
        participants
            .iter()
            .map(|p| Person::new(&p.name, first_category.as_deref()))
            .collect()
    };

    let mut weeks = build_weeks_for_year(year, Some(doc.weeks.as_slice()), defaults.week_weight);
    for week in &mut weeks {
        week.weight = clamp(week.weight, 0.0, MAX_PERCENT_FACTOR);
    }

    debug!(
        year,
        participants = participants.len(),
        weeks = weeks.len(),
        "Imported snapshot document"
    );

    Ok(Snapshot {
        purchase_price: doc.purchase_price.map(|p| p.max(0.0)),
        amort_years: doc.amort_years,
        participants,
        charges,
        year,
        weeks,
        categories,
        people,
    })
}

/// Export a snapshot as pretty-printed JSON
pub fn export_document(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Suggested file name for an export made on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("hearth-simulation-{}.json", date.format("%Y-%m-%d"))
}

impl Snapshot {
    fn week_mut(&mut self, index: u32) -> Result<&mut Week> {
        self.weeks
            .iter_mut()
            .find(|w| w.index == index)
            .ok_or_else(|| Error::NotFound(format!("week {}", index)))
    }

    fn clear_weeks_of(&mut self, name: &str) {
        for week in self.weeks.iter_mut().filter(|w| w.occupant_name == name) {
            week.occupant_name.clear();
        }
    }

    /// Switch to another accounting year, carrying weeks over by position
    pub fn change_year(&mut self, year: i32, default_weight: f64) {
        let year = clamp_year(year);
        self.weeks = build_weeks_for_year(year, Some(self.weeks.as_slice()), default_weight);
        self.year = year;
        info!("Switched snapshot to {} ({} weeks)", year, self.weeks.len());
    }

    /// Set (or clear, with an empty name) the occupant of a week
    pub fn assign_week(&mut self, index: u32, occupant: &str) -> Result<()> {
        self.week_mut(index)?.occupant_name = occupant.trim().to_string();
        Ok(())
    }

    /// Set a week's weight, clamped to [0, 1000]
    pub fn set_week_weight(&mut self, index: u32, weight: f64) -> Result<()> {
        self.week_mut(index)?.weight = clamp(weight, 0.0, MAX_PERCENT_FACTOR);
        Ok(())
    }

    /// Set or clear a week's revised price
    pub fn revise_week(&mut self, index: u32, price: Option<f64>) -> Result<()> {
        self.week_mut(index)?.revised_price = coerce::finite(price);
        Ok(())
    }

    /// Append a participant `P{n}` with 0% ownership
    pub fn add_participant(&mut self) -> &Participant {
        let name = format!("P{}", self.participants.len() + 1);
        self.participants.push(Participant::new(&name, 0.0, 0.0));
        &self.participants[self.participants.len() - 1]
    }

    /// Remove a participant, the person of the same name and their week assignments
    pub fn remove_participant(&mut self, name: &str) -> Result<()> {
        let pos = self
            .participants
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::NotFound(format!("participant '{}'", name)))?;
        self.participants.remove(pos);
        self.people.retain(|p| p.name != name);
        self.clear_weeks_of(name);
        Ok(())
    }

    /// Append a person `Person {n}` in the first category
    pub fn add_person(&mut self) -> &Person {
        let name = format!("Person {}", self.people.len() + 1);
        let category = self.categories.first().map(|c| c.name.clone());
        self.people.push(Person {
            name,
            category_name: category,
        });
        &self.people[self.people.len() - 1]
    }

    /// Remove a person and free the weeks they occupy
    pub fn remove_person(&mut self, name: &str) -> Result<()> {
        let pos = self
            .people
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::NotFound(format!("person '{}'", name)))?;
        self.people.remove(pos);
        self.clear_weeks_of(name);
        Ok(())
    }

    /// Append a neutral category `Category {n}`
    pub fn add_category(&mut self) -> &Category {
        let name = format!("Category {}", self.categories.len() + 1);
        self.categories.push(Category::new(&name, 100.0));
        &self.categories[self.categories.len() - 1]
    }

    /// Remove a category; its people move to the first remaining category
    pub fn remove_category(&mut self, name: &str) -> Result<()> {
        let pos = self
            .categories
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| Error::NotFound(format!("category '{}'", name)))?;
        self.categories.remove(pos);

        let fallback = self.categories.first().map(|c| c.name.clone());
        for person in self
            .people
            .iter_mut()
            .filter(|p| p.category_name.as_deref() == Some(name))
        {
            person.category_name = fallback.clone();
        }
        Ok(())
    }

    /// Append a zero-cost charge of the given kind
    pub fn add_charge(&mut self, kind: ChargeKind) -> &Charge {
        let charge = match kind {
            ChargeKind::Amortized => Charge::amortized("Amortization", 0.0, 5.0),
            _ => Charge::recurring("New charge", 0.0),
        };
        self.charges.push(charge);
        &self.charges[self.charges.len() - 1]
    }

    /// Remove the charge at `position` (0-based)
    pub fn remove_charge(&mut self, position: usize) -> Result<Charge> {
        if position >= self.charges.len() {
            return Err(Error::NotFound(format!("charge #{}", position)));
        }
        Ok(self.charges.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> Defaults {
        Defaults::embedded().unwrap()
    }

    fn import(value: Value) -> Snapshot {
        import_value(value, &defaults(), 2025).unwrap()
    }

    #[test]
    fn test_rejects_non_object() {
        for text in ["[1, 2]", "42", "\"text\"", "not json", "null"] {
            let result = import_document(text, &defaults(), 2025);
            assert!(
                matches!(result, Err(Error::InvalidData(ref m)) if m == "invalid file"),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_empty_object_uses_fallbacks() {
        let snapshot = import(json!({}));
        assert_eq!(snapshot.year, 2025);
        assert_eq!(snapshot.weeks.len(), 52);
        assert_eq!(snapshot.purchase_price, None);
        assert!(snapshot.participants.is_empty());
        assert_eq!(snapshot.categories, defaults().categories);
    }

    #[test]
    fn test_numeric_coercions() {
        let snapshot = import(json!({
            "purchasePrice": "300000",
            "amortYears": "abc",
            "year": "2021",
            "participants": [
                {"name": "A", "percent": "150", "loanCost": -5},
                {"name": "B", "percent": null}
            ],
            "charges": [
                {"name": "Roof", "type": "amortized", "total": 1000, "years": 0},
                {"name": "Odd", "type": "weird", "amount": 10}
            ]
        }));

        assert_eq!(snapshot.purchase_price, Some(300_000.0));
        assert_eq!(snapshot.amort_years, None);
        assert_eq!(snapshot.year, 2021);
        assert_eq!(snapshot.participants[0].ownership_percent, 100.0);
        assert_eq!(snapshot.participants[0].loan_cost, 0.0);
        assert_eq!(snapshot.participants[1].ownership_percent, 0.0);
        assert_eq!(snapshot.charges[0].years, None);
        assert_eq!(snapshot.charges[1].kind, ChargeKind::Unknown);
    }

    #[test]
    fn test_year_clamped() {
        assert_eq!(import(json!({"year": 1800})).year, coerce::MIN_YEAR);
        assert_eq!(import(json!({"year": 9999})).year, coerce::MAX_YEAR);
    }

    #[test]
    fn test_weeks_rebuilt_with_carry_over() {
        let snapshot = import(json!({
            "year": 2020,
            "weeks": [
                {"who": "A", "weight": 5000, "label": "bogus"},
                {"who": "", "weight": "x", "revisedPrice": "250"}
            ]
        }));

        assert_eq!(snapshot.weeks.len(), 53);
        assert_eq!(snapshot.weeks[0].occupant_name, "A");
        assert_eq!(snapshot.weeks[0].weight, 1000.0);
        assert_eq!(snapshot.weeks[0].label, "S01");
        assert_eq!(snapshot.weeks[1].weight, 100.0);
        assert_eq!(snapshot.weeks[1].revised_price, Some(250.0));
        assert_eq!(snapshot.weeks[2].occupant_name, "");
    }

    #[test]
    fn test_non_object_week_keeps_its_slot() {
        let text = r#"{"year": 2025, "weeks": [{"who": "A"}, null, {"who": "B"}]}"#;
        let snapshot = import_document(text, &defaults(), 2025).unwrap();

        assert_eq!(snapshot.weeks[0].occupant_name, "A");
        assert_eq!(snapshot.weeks[1].occupant_name, "");
        assert_eq!(snapshot.weeks[1].weight, 100.0);
        assert_eq!(snapshot.weeks[2].occupant_name, "B");
    }

    #[test]
    fn test_category_factor_missing_vs_zero() {
        let snapshot = import(json!({
            "categories": [{"name": "Free", "factorPct": 0}, {"name": "Plain"}, {"name": "Big", "factorPct": 2500}]
        }));
        assert_eq!(snapshot.categories[0].price_factor_percent, 0.0);
        assert_eq!(snapshot.categories[1].price_factor_percent, 100.0);
        assert_eq!(snapshot.categories[2].price_factor_percent, 1000.0);
    }

    #[test]
    fn test_people_without_category_get_first() {
        let snapshot = import(json!({
            "categories": [{"name": "Family", "factorPct": 125}],
            "people": [{"name": "Zoe"}, {"name": "Max", "categoryName": "Other"}]
        }));
        assert_eq!(snapshot.people[0].category_name.as_deref(), Some("Family"));
        assert_eq!(snapshot.people[1].category_name.as_deref(), Some("Other"));
    }

    #[test]
    fn test_missing_people_derived_from_participants() {
        let snapshot = import(json!({"participants": [{"name": "A", "percent": 100}]}));
        assert_eq!(snapshot.people, vec![Person::new("A", Some("Owners"))]);
    }

    #[test]
    fn test_export_then_import_keeps_document() {
        let original = defaults().snapshot(2024);
        let text = export_document(&original).unwrap();
        assert!(text.contains("\"factorPct\""));
        let imported = import_document(&text, &defaults(), 2000).unwrap();
        assert_eq!(imported, original);
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "hearth-simulation-2025-03-07.json");
    }

    #[test]
    fn test_week_edits() {
        let mut snapshot = defaults().snapshot(2025);
        snapshot.assign_week(3, "  P1 ").unwrap();
        snapshot.set_week_weight(3, 1500.0).unwrap();
        snapshot.revise_week(3, Some(800.0)).unwrap();

        let week = &snapshot.weeks[2];
        assert_eq!(week.occupant_name, "P1");
        assert_eq!(week.weight, 1000.0);
        assert_eq!(week.revised_price, Some(800.0));

        snapshot.revise_week(3, None).unwrap();
        assert_eq!(snapshot.weeks[2].revised_price, None);

        assert!(matches!(snapshot.assign_week(99, "P1"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_change_year_carries_weeks() {
        let mut snapshot = defaults().snapshot(2020);
        snapshot.assign_week(1, "P2").unwrap();
        snapshot.change_year(2021, 100.0);
        assert_eq!(snapshot.year, 2021);
        assert_eq!(snapshot.weeks.len(), 52);
        assert_eq!(snapshot.weeks[0].occupant_name, "P2");
    }

    #[test]
    fn test_remove_participant_cascades() {
        let mut snapshot = defaults().snapshot(2025);
        snapshot.assign_week(1, "P1").unwrap();
        snapshot.assign_week(2, "P2").unwrap();

        snapshot.remove_participant("P1").unwrap();
        assert!(snapshot.participants.iter().all(|p| p.name != "P1"));
        assert!(snapshot.find_person("P1").is_none());
        assert_eq!(snapshot.weeks[0].occupant_name, "");
        assert_eq!(snapshot.weeks[1].occupant_name, "P2");

        assert!(matches!(
            snapshot.remove_participant("P1"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_person_frees_weeks() {
        let mut snapshot = defaults().snapshot(2025);
        snapshot.assign_week(5, "P3").unwrap();
        snapshot.remove_person("P3").unwrap();
        assert_eq!(snapshot.weeks[4].occupant_name, "");
        // The participant stays
        assert!(snapshot.participants.iter().any(|p| p.name == "P3"));
    }

    #[test]
    fn test_remove_category_reassigns_people() {
        let mut snapshot = defaults().snapshot(2025);
        snapshot.people[0].category_name = Some("Family".to_string());
        snapshot.remove_category("Family").unwrap();
        assert_eq!(snapshot.people[0].category_name.as_deref(), Some("Owners"));

        snapshot.remove_category("Owners").unwrap();
        assert!(snapshot
            .people
            .iter()
            .all(|p| p.category_name.as_deref() == Some("Close family")));
    }

    #[test]
    fn test_remove_last_category_leaves_people_uncategorized() {
        let mut snapshot = defaults().snapshot(2025);
        snapshot.categories.truncate(1);
        snapshot.remove_category("Owners").unwrap();
        assert!(snapshot.people.iter().all(|p| p.category_name.is_none()));
    }

    #[test]
    fn test_add_entities() {
        let mut snapshot = defaults().snapshot(2025);
        assert_eq!(snapshot.add_participant().name, "P4");
        assert_eq!(snapshot.add_person().name, "Person 4");
        assert_eq!(
            snapshot.people[3].category_name.as_deref(),
            Some("Owners")
        );
        let category = snapshot.add_category();
        assert_eq!(category.name, "Category 5");
        assert_eq!(category.price_factor_percent, 100.0);

        assert_eq!(snapshot.add_charge(ChargeKind::Amortized).years, Some(5.0));
        let removed = snapshot.remove_charge(snapshot.charges.len() - 1).unwrap();
        assert_eq!(removed.kind, ChargeKind::Amortized);
        assert!(snapshot.remove_charge(100).is_err());
    }
}
