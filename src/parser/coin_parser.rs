// Market-table HTML parsing
use crate::config::ColumnLayout;
use crate::model::{MarketRecord, ParserError};
use crate::normalizer::{parse_market_cap, parse_money, parse_percent};
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

pub trait Parser {
    /// Parses at most `limit` rows (0 means all rows).
    fn parse(&self, html: &str, limit: usize) -> Result<Vec<MarketRecord>, ParserError>;
}

pub struct CoinTableParser {
    layout: ColumnLayout,
    row_selector: Selector,
    cell_selector: Selector,
    name_selector: Selector,
    symbol_selector: Selector,
    down_selector: Selector,
}

fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::SelectorError(format!("{}: {}", css, e)))
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

impl CoinTableParser {
    pub fn new(layout: ColumnLayout) -> Result<Self, ParserError> {
        Ok(Self {
            layout,
            row_selector: selector("table tbody tr")?,
            cell_selector: selector("td")?,
            name_selector: selector("p")?,
            symbol_selector: selector("span.coin-item-symbol, p.coin-item-symbol")?,
            down_selector: selector("[class*=down]")?,
        })
    }

    fn parse_row(&self, index: usize, row: ElementRef) -> Option<MarketRecord> {
        let cells: Vec<ElementRef> = row.select(&self.cell_selector).collect();
        if cells.len() < self.layout.min_cells() {
            warn!("Row {}: {} cells, skipping malformed row", index, cells.len());
            return None;
        }

        let name_cell = &cells[self.layout.name];
        let name = name_cell
            .select(&self.name_selector)
            .next()
            .map(|p| cell_text(&p))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        let symbol = name_cell
            .select(&self.symbol_selector)
            .next()
            .map(|s| cell_text(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "N/A".to_string());

        let price_text = cell_text(&cells[self.layout.price]);
        let Some(price) = parse_money(&price_text) else {
            warn!("Row {} ({}): unreadable price {:?}", index, name, price_text);
            return None;
        };

        let cap_text = cell_text(&cells[self.layout.market_cap]);
        let Some(market_cap) = parse_market_cap(&cap_text) else {
            warn!("Row {} ({}): unreadable market cap {:?}", index, name, cap_text);
            return None;
        };

        let change_cell = &cells[self.layout.change_24h];
        let negative = change_cell.select(&self.down_selector).next().is_some()
            || change_cell.value().classes().any(|c| c.contains("down"));
        let change_text = cell_text(change_cell);
        let Some(change_24h) = parse_percent(&change_text, negative) else {
            warn!("Row {} ({}): unreadable 24h change {:?}", index, name, change_text);
            return None;
        };

        Some(MarketRecord {
            name,
            symbol,
            price,
            market_cap,
            change_24h,
        })
    }
}

impl Parser for CoinTableParser {
    fn parse(&self, html: &str, limit: usize) -> Result<Vec<MarketRecord>, ParserError> {
        let document = Html::parse_document(html);

        let rows: Vec<ElementRef> = document.select(&self.row_selector).collect();
        if rows.is_empty() {
            return Err(ParserError::MissingElement("table tbody tr".into()));
        }

        let take = if limit == 0 { rows.len() } else { limit };
        let records: Vec<MarketRecord> = rows
            .into_iter()
            .take(take)
            .enumerate()
            .filter_map(|(i, row)| self.parse_row(i, row))
            .collect();

        if records.is_empty() {
            return Err(ParserError::NoRecords);
        }
        info!("Parsed {} market records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, symbol: &str, price: &str, change: &str, down: bool, cap: &str) -> String {
        let caret = if down { "icon-Caret-down" } else { "icon-Caret-up" };
        format!(
            r#"<tr>
                <td><span class="star"></span></td>
                <td><p>1</p></td>
                <td><a href="/currencies/x/"><p class="coin-item-name">{name}</p><p class="coin-item-symbol">{symbol}</p></a></td>
                <td><span>{price}</span></td>
                <td><span><span class="icon-Caret-up"></span>0.10%</span></td>
                <td><span class="sc-change"><span class="{caret}"></span>{change}</span></td>
                <td><span>1.50%</span></td>
                <td><p><span class="short">{cap_short}</span><span class="full">{cap}</span></p></td>
            </tr>"#,
            cap_short = "$1.2T",
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            "<html><body><table><thead><tr><th>#</th></tr></thead><tbody>{}</tbody></table></body></html>",
            rows.join("\n")
        )
    }

    fn parser() -> CoinTableParser {
        CoinTableParser::new(ColumnLayout::default()).unwrap()
    }

    #[test]
    fn parses_every_well_formed_row() {
        let html = page(&[
            row("Bitcoin", "BTC", "$64,250.12", "1.25%", false, "$1,269,870,123,456"),
            row("Ethereum", "ETH", "$3,100.50", "2.40%", true, "$372,000,000,000"),
            row("Tether", "USDT", "$0.9998", "0.01%", false, "$110,500,000,000"),
        ]);

        let records = parser().parse(&html, 20).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            MarketRecord {
                name: "Bitcoin".into(),
                symbol: "BTC".into(),
                price: 64250.12,
                market_cap: 1_269_870_123_456.0,
                change_24h: 1.25,
            }
        );
        assert_eq!(records[1].change_24h, -2.4);
        assert_eq!(records[2].symbol, "USDT");
        assert_eq!(records[2].price, 0.9998);
    }

    #[test]
    fn respects_row_limit() {
        let rows: Vec<String> = (0..6)
            .map(|i| row(&format!("Coin{}", i), "C", "$1.00", "1%", false, "$1,000"))
            .collect();
        let html = page(&rows);
        assert_eq!(parser().parse(&html, 4).unwrap().len(), 4);
        assert_eq!(parser().parse(&html, 0).unwrap().len(), 6);
    }

    #[test]
    fn skips_short_and_unreadable_rows() {
        let html = page(&[
            "<tr><td>ad slot</td></tr>".to_string(),
            row("Broken", "BRK", "--", "1%", false, "$10"),
            row("Solana", "SOL", "$140.00", "3.10%", false, "$65,000,000,000"),
        ]);
        let records = parser().parse(&html, 20).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Solana");
    }

    #[test]
    fn missing_name_and_symbol_fall_back() {
        let html = page(&[r#"<tr><td></td><td></td><td><a>?</a></td><td>$2.00</td><td></td><td>5%</td><td></td><td>$20</td></tr>"#.to_string()]);
        let records = parser().parse(&html, 20).unwrap();
        assert_eq!(records[0].name, "Unknown");
        assert_eq!(records[0].symbol, "N/A");
        assert_eq!(records[0].market_cap, 20.0);
    }

    #[test]
    fn page_without_table_is_layout_error() {
        let err = parser().parse("<html><body><div>maintenance</div></body></html>", 20).unwrap_err();
        assert!(matches!(err, ParserError::MissingElement(_)));
    }

    #[test]
    fn table_without_usable_rows_is_no_records() {
        let html = page(&["<tr><td>only one cell</td></tr>".to_string()]);
        assert!(matches!(parser().parse(&html, 20), Err(ParserError::NoRecords)));
    }
}
