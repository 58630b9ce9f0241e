// src/adapter/catalog.rs
// Symbols offered in the selection list

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolCategory {
    UsEquity,
    IndianEquity,
    CommodityFuture,
    Etf,
}

impl fmt::Display for SymbolCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolCategory::UsEquity => write!(f, "US stock"),
            SymbolCategory::IndianEquity => write!(f, "Indian stock"),
            SymbolCategory::CommodityFuture => write!(f, "Commodity"),
            SymbolCategory::Etf => write!(f, "ETF"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedSymbol {
    pub symbol: &'static str,
    pub category: SymbolCategory,
    pub description: Option<&'static str>,
}

const fn suggested(
    symbol: &'static str,
    category: SymbolCategory,
    description: Option<&'static str>,
) -> SuggestedSymbol {
    SuggestedSymbol {
        symbol,
        category,
        description,
    }
}

/// The selection list. Anything else typed in is still fetched.
pub const SUGGESTED_SYMBOLS: &[SuggestedSymbol] = &[
    suggested("AAPL", SymbolCategory::UsEquity, None),
    suggested("TSLA", SymbolCategory::UsEquity, None),
    suggested("GOOGL", SymbolCategory::UsEquity, None),
    suggested("MSFT", SymbolCategory::UsEquity, None),
    suggested("AMZN", SymbolCategory::UsEquity, None),
    suggested("META", SymbolCategory::UsEquity, None),
    suggested("NFLX", SymbolCategory::UsEquity, None),
    suggested("TCS.NS", SymbolCategory::IndianEquity, None),
    suggested("RELIANCE.NS", SymbolCategory::IndianEquity, None),
    suggested("GC=F", SymbolCategory::CommodityFuture, Some("Gold")),
    suggested("SI=F", SymbolCategory::CommodityFuture, Some("Silver")),
    suggested("GLD", SymbolCategory::Etf, Some("Gold ETF")),
    suggested("SLV", SymbolCategory::Etf, Some("Silver ETF")),
];

pub fn lookup(symbol: &str) -> Option<&'static SuggestedSymbol> {
    SUGGESTED_SYMBOLS.iter().find(|s| s.symbol == symbol)
}

/// Heading text for a symbol, e.g. "GC=F (Gold)".
pub fn display_name(symbol: &str) -> String {
    match lookup(symbol).and_then(|s| s.description) {
        Some(description) => format!("{} ({})", symbol, description),
        None => symbol.to_string(),
    }
}
