use std::collections::HashMap;

use crate::domain::{Symbol, GOLD_SPOT_TICKER};
use crate::error::ValidationError;

/// Maps user-facing aliases to the canonical symbols providers expect.
///
/// Lookup is case-insensitive; unknown tickers pass through unchanged
/// (modulo case normalization). Pure, no side effects.
#[derive(Debug, Clone)]
pub struct SymbolResolver {
    aliases: HashMap<String, Symbol>,
}

impl SymbolResolver {
    pub fn new(aliases: HashMap<String, Symbol>) -> Self {
        let aliases = aliases
            .into_iter()
            .map(|(alias, symbol)| (alias.to_lowercase(), symbol))
            .collect();
        Self { aliases }
    }

    /// The stock alias table: "gold" resolves to the gold spot ticker.
    pub fn with_default_aliases() -> Self {
        let mut aliases = HashMap::new();
        if let Ok(gold) = Symbol::parse(GOLD_SPOT_TICKER) {
            aliases.insert(String::from("gold"), gold);
        }
        Self { aliases }
    }

    pub fn resolve(&self, ticker: &str) -> Result<Symbol, ValidationError> {
        if let Some(symbol) = self.aliases.get(&ticker.trim().to_lowercase()) {
            return Ok(symbol.clone());
        }
        Symbol::parse(ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_alias_case_insensitively() {
        let resolver = SymbolResolver::with_default_aliases();

        for alias in ["gold", "GOLD", "Gold"] {
            let symbol = resolver.resolve(alias).expect("alias should resolve");
            assert_eq!(symbol.as_str(), "XAU");
        }
    }

    #[test]
    fn unknown_ticker_passes_through() {
        let resolver = SymbolResolver::with_default_aliases();

        let symbol = resolver.resolve("AAPL").expect("ticker should parse");
        assert_eq!(symbol.as_str(), "AAPL");
    }

    #[test]
    fn pass_through_still_normalizes_case() {
        let resolver = SymbolResolver::with_default_aliases();

        let symbol = resolver.resolve("msft").expect("ticker should parse");
        assert_eq!(symbol.as_str(), "MSFT");
    }

    #[test]
    fn structurally_invalid_ticker_is_rejected() {
        let resolver = SymbolResolver::with_default_aliases();

        resolver.resolve("not a ticker").expect_err("must fail");
    }
}
