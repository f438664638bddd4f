//! Static event context attached to detected movements.
//!
//! The tables are heuristic background, not evidence of cause.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Events attached to an indicator whose key contains `keyword`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextRule {
    pub keyword: String,
    pub events: BTreeMap<i32, String>,
}

impl ContextRule {
    pub fn new(keyword: impl Into<String>, events: &[(i32, &str)]) -> Self {
        Self {
            keyword: keyword.into(),
            events: events
                .iter()
                .map(|&(year, description)| (year, description.to_string()))
                .collect(),
        }
    }

    /// Plain substring match, so `"gdp_growth"` matches the `"gdp"` rule.
    pub fn matches(&self, indicator_key: &str) -> bool {
        indicator_key.contains(self.keyword.as_str())
    }
}

/// Year-keyed global events plus the ordered indicator-specific rules.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KnowledgeBase {
    pub global_events: BTreeMap<i32, String>,
    pub rules: Vec<ContextRule>,
}

impl KnowledgeBase {
    pub fn new(global_events: BTreeMap<i32, String>, rules: Vec<ContextRule>) -> Self {
        Self {
            global_events,
            rules,
        }
    }

    /// The built-in tables, initialized on first use.
    pub fn builtin() -> &'static KnowledgeBase {
        &BUILTIN
    }

    /// Every description that applies to `year` for `indicator_key`: the global event first,
    /// then matching rules in rule-list order.
    pub fn reasons(&self, indicator_key: &str, year: i32) -> Vec<String> {
        let global = self.global_events.get(&year);
        let specific = self
            .rules
            .iter()
            .filter(|rule| rule.matches(indicator_key))
            .filter_map(|rule| rule.events.get(&year));

        global.into_iter().chain(specific).cloned().collect()
    }
}

static BUILTIN: LazyLock<KnowledgeBase> = LazyLock::new(|| {
    let global_events = [
        (2001, "Dot-com aftermath and 9/11 shocks affecting global growth and risk appetite"),
        (2003, "SARS outbreak impacting Asian travel and health indicators"),
        (2008, "Global financial crisis peak; credit contraction and demand slump"),
        (2009, "Post-crisis recession; lingering unemployment and GDP contraction"),
        (2011, "European sovereign debt concerns; uneven recovery"),
        (2014, "Oil price collapse impacting energy exporters and inflation"),
        (2015, "Chinese market volatility; adjustments in global trade flows"),
        (2016, "Brexit referendum uncertainty (mainly UK/EU); global policy shifts"),
        (
            2020,
            "COVID-19 pandemic shock: mobility restrictions, demand collapse, health system strain",
        ),
        (2021, "Initial recovery phase; supply chain bottlenecks and rebound effects"),
        (2022, "Energy/commodity price surge and inflation spike (Ukraine conflict)"),
        (2023, "Post-pandemic normalization; disinflation trends and recovery consolidation"),
    ]
    .into_iter()
    .map(|(year, description)| (year, description.to_string()))
    .collect();

    let rules = vec![
        ContextRule::new(
            "gdp",
            &[
                (2008, "Sharp downturn in output due to financial crisis"),
                (2020, "Historic contraction from pandemic restrictions"),
                (2022, "Commodity price dynamics and uneven recovery"),
            ],
        ),
        ContextRule::new(
            "inflation",
            &[
                (2020, "Low inflation amid demand shock"),
                (2022, "Global inflation spike driven by energy & supply chains"),
            ],
        ),
        ContextRule::new(
            "unemployment",
            &[
                (2009, "Labor market deterioration post-crisis"),
                (2020, "Sudden spike from lockdowns"),
            ],
        ),
        ContextRule::new(
            "co2",
            &[(2020, "Temporary emissions drop from reduced mobility & industry")],
        ),
        ContextRule::new(
            "energy",
            &[
                (2014, "Oil price collapse altering energy investment"),
                (2022, "Energy price shock and policy shifts"),
            ],
        ),
        ContextRule::new(
            "internet",
            &[(2020, "Acceleration in digital adoption under lockdowns")],
        ),
        ContextRule::new(
            "health",
            &[(2020, "Healthcare strain and vaccination disruptions")],
        ),
    ];

    KnowledgeBase::new(global_events, rules)
});
