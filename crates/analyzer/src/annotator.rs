use crate::detector::{CountryMovements, MovementRecord};
use crate::knowledge::KnowledgeBase;
use core_types::Direction;
use indexmap::IndexMap;
use serde::Serialize;

/// A detected movement together with the context found for its year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationEntry {
    pub country: String,
    pub year: i32,
    pub direction: Direction,
    pub change_pct: f64,
    pub value: f64,
    /// May be empty; fallback wording is added only when rendering.
    pub reasons: Vec<String>,
}

/// Attaches knowledge-base context to detected movements.
#[derive(Debug, Clone, Copy)]
pub struct ContextualAnnotator<'kb> {
    knowledge: &'kb KnowledgeBase,
}

impl ContextualAnnotator<'static> {
    /// An annotator backed by the built-in event tables.
    pub fn new() -> Self {
        Self {
            knowledge: KnowledgeBase::builtin(),
        }
    }
}

impl Default for ContextualAnnotator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'kb> ContextualAnnotator<'kb> {
    pub fn with_knowledge_base(knowledge: &'kb KnowledgeBase) -> Self {
        Self { knowledge }
    }

    /// Produces one entry per movement record: for each country in detector order, its dips
    /// first and then its rises.
    pub fn annotate(
        &self,
        movements: &IndexMap<String, CountryMovements>,
        indicator_key: &str,
    ) -> Vec<ExplanationEntry> {
        movements
            .values()
            .flat_map(|m| {
                let dips = m.dips.iter().map(|r| (Direction::Dip, r));
                let rises = m.rises.iter().map(|r| (Direction::Rise, r));
                dips.chain(rises)
            })
            .map(|(direction, record)| self.entry(direction, record, indicator_key))
            .collect()
    }

    fn entry(
        &self,
        direction: Direction,
        record: &MovementRecord,
        indicator_key: &str,
    ) -> ExplanationEntry {
        ExplanationEntry {
            country: record.country.clone(),
            year: record.year,
            direction,
            change_pct: record.change_pct,
            value: record.value,
            reasons: self.knowledge.reasons(indicator_key, record.year),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::ContextRule;
    use std::collections::BTreeMap;

    fn record(country: &str, year: i32, change_pct: f64) -> MovementRecord {
        MovementRecord {
            country: country.to_string(),
            year,
            change_pct,
            value: 1.0,
        }
    }

    fn movements() -> IndexMap<String, CountryMovements> {
        IndexMap::from([
            (
                "Zambia".to_string(),
                CountryMovements {
                    rises: vec![record("Zambia", 2021, 12.0)],
                    dips: vec![record("Zambia", 2020, -8.0), record("Zambia", 2015, -2.0)],
                },
            ),
            (
                "Austria".to_string(),
                CountryMovements {
                    rises: vec![record("Austria", 2005, 3.0)],
                    dips: vec![record("Austria", 2009, -4.0)],
                },
            ),
        ])
    }

    #[test]
    fn dips_come_before_rises_within_each_country() {
        let entries = ContextualAnnotator::new().annotate(&movements(), "gdp");
        let order: Vec<(&str, i32, Direction)> = entries
            .iter()
            .map(|e| (e.country.as_str(), e.year, e.direction))
            .collect();

        assert_eq!(
            order,
            vec![
                ("Zambia", 2020, Direction::Dip),
                ("Zambia", 2015, Direction::Dip),
                ("Zambia", 2021, Direction::Rise),
                ("Austria", 2009, Direction::Dip),
                ("Austria", 2005, Direction::Rise),
            ]
        );
    }

    #[test]
    fn reasons_are_resolved_per_year() {
        let entries = ContextualAnnotator::new().annotate(&movements(), "gdp");

        assert_eq!(entries[0].reasons.len(), 2);
        assert_eq!(entries[1].reasons.len(), 1);
        // 2005 has no event at all; the domain result stays empty.
        assert!(entries[4].reasons.is_empty());
    }

    #[test]
    fn custom_knowledge_base_is_used() {
        let kb = KnowledgeBase::new(
            BTreeMap::new(),
            vec![ContextRule::new("gdp", &[(2005, "Boom")])],
        );
        let entries = ContextualAnnotator::with_knowledge_base(&kb).annotate(&movements(), "gdp");

        assert!(entries[0].reasons.is_empty());
        assert_eq!(entries[4].reasons, vec!["Boom"]);
    }
}
