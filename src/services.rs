//! Injected collaborators and the research fallback chain.

use anyhow::Result;
use tracing::{debug, warn};

pub trait WebSearch: Send + Sync {
    /// Free-text research for `query`; `Ok(None)` when nothing was found.
    fn search(&self, query: &str) -> Result<Option<String>>;
}

pub trait LlmClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<Option<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchSource {
    WebSearch,
    CuratedLookup,
    Simulated,
}

impl ResearchSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResearchSource::WebSearch => "web_search",
            ResearchSource::CuratedLookup => "curated_lookup",
            ResearchSource::Simulated => "simulated",
        }
    }
}

/// Known product lines and what they are made of.
const CURATED: &[(&str, &str)] = &[
    (
        "goboard",
        "GoBoard is a lightweight backer board with a polyisocyanurate (polyiso) foam core \
         and a waterproof facing, used as a tile substrate in showers.",
    ),
    (
        "kerdi-board",
        "KERDI-BOARD is a foam board of extruded polystyrene (XPS) with a waterproof fleece \
         covering, used as a tile backer.",
    ),
    (
        "wedi",
        "wedi building panels have an extruded polystyrene foam core with a cement resin \
         coating and are waterproof.",
    ),
    (
        "hardiebacker",
        "HardieBacker is a fiber cement board made of portland cement and sand, a \
         cementitious tile backer.",
    ),
    (
        "durock",
        "Durock is a cement board of portland cement and aggregate with glass-fiber mesh, a \
         cementitious substrate.",
    ),
    (
        "redgard",
        "RedGard is a water-based liquid waterproofing membrane, an elastomeric chemical \
         formula rolled onto substrates.",
    ),
    (
        "schluter",
        "Schluter edge profiles are made of aluminum, stainless steel or brass; metal trim \
         for tile edges.",
    ),
    (
        "aqua mix",
        "Aqua Mix sealers and cleaners are water-based chemical formulas; penetrating \
         solvent-free sealer.",
    ),
];

/// Deterministic stand-in research keyed on what the query asks about.
const SIMULATED: &[(&[&str], &str)] = &[
    (
        &["sealer", "cleaner", "enhancer", "polish", "impregnator"],
        "Product is a water-based chemical formula; a penetrating solution for stone and tile.",
    ),
    (
        &["screw", "bolt", "washer", "anchor", "fastener"],
        "Zinc-coated steel screw; metal hardware for backer board.",
    ),
    (
        &["trowel", "float", "cutter", "saw", "nippers"],
        "Tool with a stainless steel blade and a metal frame.",
    ),
    (
        &["caulk", "silicone"],
        "Flexible 100% silicone rubber sealant.",
    ),
    (
        &["grout", "mortar", "thinset", "thin-set"],
        "Portland cement based cementitious mortar; mix with water.",
    ),
    (
        &["porcelain"],
        "Dense vitreous porcelain body, kiln-fired with low water absorption.",
    ),
];

const NO_INFORMATION: &str = "No additional product information available.";

/// Research chain: injected web search, else curated lookup, else simulation.
#[derive(Clone, Copy, Default)]
pub struct Research<'a> {
    web: Option<&'a dyn WebSearch>,
}

impl<'a> Research<'a> {
    pub fn new(web: Option<&'a dyn WebSearch>) -> Self {
        Self { web }
    }

    /// Exactly one research attempt. `None` text means the attempt failed and
    /// the caller keeps its original value.
    pub fn lookup(&self, query: &str) -> (Option<String>, ResearchSource) {
        if let Some(web) = self.web {
            return match web.search(query) {
                Ok(found) => (found, ResearchSource::WebSearch),
                Err(e) => {
                    warn!("Web search failed for {:?}: {:#}", query, e);
                    (None, ResearchSource::WebSearch)
                }
            };
        }
        let lower = query.to_lowercase();
        if let Some((_, text)) = CURATED.iter().find(|(key, _)| lower.contains(key)) {
            debug!("Curated lookup hit for {:?}", query);
            return (Some(text.to_string()), ResearchSource::CuratedLookup);
        }
        let text = SIMULATED
            .iter()
            .find(|(terms, _)| terms.iter().any(|t| lower.contains(t)))
            .map_or(NO_INFORMATION, |(_, text)| *text);
        (Some(text.to_string()), ResearchSource::Simulated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct Failing;

    impl WebSearch for Failing {
        fn search(&self, _query: &str) -> Result<Option<String>> {
            Err(anyhow!("timeout"))
        }
    }

    #[test]
    fn curated_before_simulated() {
        let (text, source) = Research::default().lookup("GoBoard Backer Board material");
        assert_eq!(source, ResearchSource::CuratedLookup);
        assert!(text.unwrap().contains("polyisocyanurate"));
    }

    #[test]
    fn simulation_is_deterministic() {
        let r = Research::default();
        let a = r.lookup("Stone Sealer material");
        assert_eq!(a.1, ResearchSource::Simulated);
        assert_eq!(a, r.lookup("Stone Sealer material"));
        assert_eq!(r.lookup("something else").0.as_deref(), Some(NO_INFORMATION));
    }

    #[test]
    fn web_failure_yields_no_text() {
        let web = Failing;
        let (text, source) = Research::new(Some(&web)).lookup("anything");
        assert_eq!(text, None);
        assert_eq!(source.as_str(), "web_search");
    }
}
