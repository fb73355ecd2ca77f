use chrono::NaiveDate;
use reqwest::header::USER_AGENT;
use reqwest::Client as HttpClient;
use scraper::{Html, Selector};
use tracing::debug;

use crate::models::DailyQuote;
use crate::utils::errors::AppError;

/// HTTP client for the infobolsa pages.
///
/// Holds the listing URL and the per-company history URL template so tests
/// and mirrors can point it elsewhere.
pub struct HistoryClient {
    http_client: HttpClient,
    listing_url: String,
    history_url: String,
}

impl HistoryClient {
    const DEFAULT_LISTING_URL: &'static str = "https://www.infobolsa.es/acciones/ibex35";
    const DEFAULT_HISTORY_URL: &'static str =
        "https://www.infobolsa.es/cotizacion/historico-{company}";
    // The site serves an empty shell to the default reqwest agent
    const BROWSER_USER_AGENT: &'static str =
        "Mozilla/5.0 (Windows NT 6.1; Win64; x64; rv:52.0) Gecko/20100101 Firefox/52.0";

    /// Create a client against the default infobolsa endpoints.
    pub fn new() -> Self {
        Self::with_urls(
            Self::DEFAULT_LISTING_URL.to_string(),
            Self::DEFAULT_HISTORY_URL.to_string(),
        )
    }

    /// Create a client with custom endpoints (for testing and mirrors).
    pub fn with_urls(listing_url: String, history_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            listing_url,
            history_url,
        }
    }

    /// Create a client from the environment, falling back to the defaults.
    /// `IBEXPLOT_LISTING_URL` and `IBEXPLOT_HISTORY_URL` override the
    /// endpoints; the history URL must contain a `{company}` placeholder.
    pub fn from_env() -> Self {
        let listing_url = std::env::var("IBEXPLOT_LISTING_URL")
            .unwrap_or_else(|_| Self::DEFAULT_LISTING_URL.to_string());
        let history_url = std::env::var("IBEXPLOT_HISTORY_URL")
            .unwrap_or_else(|_| Self::DEFAULT_HISTORY_URL.to_string());
        Self::with_urls(listing_url, history_url)
    }

    async fn get_page(&self, url: &str) -> Result<String, AppError> {
        debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .header(USER_AGENT, Self::BROWSER_USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    /// Fetch the IBEX35 listing page and return the company names in the
    /// order the page lists them.
    pub async fn fetch_companies(&self) -> Result<Vec<String>, AppError> {
        let html = self.get_page(&self.listing_url).await?;
        parse_listing(&html)
    }

    /// Fetch a company's historic page and return its daily quotes,
    /// ascending by date.
    pub async fn fetch_history(&self, slug: &str) -> Result<Vec<DailyQuote>, AppError> {
        let url = self.history_url.replace("{company}", slug);
        let html = self.get_page(&url).await?;
        parse_history(&html)
    }
}

impl Default for HistoryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Every `<table>` in the document as (header cells, data rows).
fn extract_tables(html: &str) -> Vec<(Vec<String>, Vec<Vec<String>>)> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table").unwrap();
    let tr_sel = Selector::parse("tr").unwrap();
    let th_sel = Selector::parse("th").unwrap();
    let td_sel = Selector::parse("td").unwrap();

    let mut tables = Vec::new();
    for table in document.select(&table_sel) {
        let mut headers = Vec::new();
        let mut rows = Vec::new();
        for tr in table.select(&tr_sel) {
            let header_cells: Vec<String> = tr.select(&th_sel).map(cell_text).collect();
            if headers.is_empty() && !header_cells.is_empty() {
                headers = header_cells;
                continue;
            }
            let data_cells: Vec<String> = tr.select(&td_sel).map(cell_text).collect();
            if !data_cells.is_empty() {
                rows.push(data_cells);
            }
        }
        tables.push((headers, rows));
    }
    tables
}

fn cell_text(cell: scraper::ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn column_index(headers: &[String], label: &str) -> Result<usize, AppError> {
    let wanted = label.to_lowercase();
    headers
        .iter()
        .position(|h| h.trim().to_lowercase() == wanted)
        .ok_or_else(|| AppError::Parse(format!("table has no '{}' column", label)))
}

/// Extract the `Nombre` column of the listing table.
pub fn parse_listing(html: &str) -> Result<Vec<String>, AppError> {
    let tables = extract_tables(html);
    let (headers, rows) = tables
        .iter()
        .find(|(headers, _)| {
            headers
                .iter()
                .any(|h| h.trim().to_lowercase() == "nombre")
        })
        .ok_or_else(|| {
            AppError::Parse("listing page has no table with a 'Nombre' column".to_string())
        })?;
    let name_col = column_index(headers, "Nombre")?;

    let names: Vec<String> = rows
        .iter()
        .filter_map(|row| row.get(name_col))
        .filter(|name| !name.is_empty())
        .cloned()
        .collect();

    if names.is_empty() {
        return Err(AppError::Parse(
            "listing table has an empty 'Nombre' column".to_string(),
        ));
    }
    Ok(names)
}

/// Parse a company's historic page into daily quotes, ascending by date.
///
/// The source page splits the historic table in two: the header labels sit in
/// one table and the data rows in the next, so the labels are taken from the
/// first table that has any and the rows from the first table that has any.
/// Column positions are resolved by their Spanish labels, wherever they sit.
pub fn parse_history(html: &str) -> Result<Vec<DailyQuote>, AppError> {
    let tables = extract_tables(html);
    let headers = tables
        .iter()
        .map(|(headers, _)| headers)
        .find(|headers| !headers.is_empty())
        .ok_or_else(|| AppError::Parse("historic page has no table header row".to_string()))?;
    let rows = tables
        .iter()
        .map(|(_, rows)| rows)
        .find(|rows| !rows.is_empty())
        .ok_or_else(|| AppError::Parse("historic page has no table data rows".to_string()))?;

    let date_col = column_index(headers, "Fecha")?;
    let close_col = column_index(headers, "Último")?;
    let open_col = column_index(headers, "Apertura")?;
    let low_col = column_index(headers, "Mínimo")?;
    let high_col = column_index(headers, "Máximo")?;
    let width = [date_col, close_col, open_col, low_col, high_col]
        .into_iter()
        .max()
        .unwrap_or(0)
        + 1;

    let mut quotes = Vec::with_capacity(rows.len());
    for row in rows {
        if row.len() < width {
            debug!("Skipping short row: {:?}", row);
            continue;
        }
        let date = parse_date(&row[date_col]).ok_or_else(|| {
            AppError::Parse(format!("unreadable date cell '{}'", row[date_col]))
        })?;
        quotes.push(DailyQuote {
            date,
            open: parse_price(&row[open_col]),
            close: parse_price(&row[close_col]),
            low: parse_price(&row[low_col]),
            high: parse_price(&row[high_col]),
        });
    }

    // The page usually lists newest first; the chart wants oldest first, so
    // sort instead of trusting the source order.
    quotes.sort_by_key(|q| q.date);
    Ok(quotes)
}

/// Day-first date in any of the formats the site has used.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y"]
        .into_iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// European-formatted decimal (`1.234,56`). A malformed cell becomes NaN and
/// propagates into the chart unchanged.
fn parse_price(raw: &str) -> f64 {
    let raw = raw.trim();
    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.to_string()
    };
    normalized.parse().unwrap_or(f64::NAN)
}
