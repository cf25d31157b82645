use std::borrow::Cow;
use std::fmt::{self, Write};
use shared::types::EnrichedClient;
use crate::enrich::CallLog;

const TITLE: &str = "CLAMS (Client Location Access Mist Search)";

/// Everything one page render needs
#[derive(Debug, Default)]
pub struct PageView<'a> {
    /// Submitted identifier, echoed back into the form
    pub identifier: Option<&'a str>,
    pub error: Option<String>,
    /// None: no search ran. Some(empty): search ran, nothing matched.
    pub results: Option<&'a [EnrichedClient]>,
    /// Present after any POST
    pub diagnostics: Option<Diagnostics<'a>>,
}

#[derive(Debug)]
pub struct Diagnostics<'a> {
    pub base_url: &'a str,
    pub org_id: &'a str,
    pub calls: &'a CallLog,
}

/// HTML-escape text for element content and quoted attributes
pub fn escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

pub fn page(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096);
    // Writing into a String cannot fail
    let _ = write_page(&mut html, view);
    html
}

fn write_page(html: &mut String, view: &PageView<'_>) -> fmt::Result {
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"UTF-8\">")?;
    writeln!(html, "<title>{}</title>", TITLE)?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(html, "<h1>{}</h1>", TITLE)?;

    form(html, view.identifier.unwrap_or(""))?;

    if let Some(error) = &view.error {
        writeln!(
            html,
            "<div class=\"error\" role=\"alert\"><p><strong>API Error</strong></p><p>{}</p></div>",
            escape(error)
        )?;
    }

    if let Some(results) = view.results {
        results_table(html, view.identifier.unwrap_or("Client"), results)?;
    }

    if let Some(diagnostics) = &view.diagnostics {
        diagnostics_panel(html, diagnostics)?;
    }

    writeln!(html, "</body>")?;
    writeln!(html, "</html>")
}

fn form(html: &mut String, identifier: &str) -> fmt::Result {
    writeln!(html, "<form method=\"POST\">")?;
    writeln!(
        html,
        "<label for=\"client_identifier\">Client Identifier (Name, Hostname, or MAC)</label>"
    )?;
    writeln!(
        html,
        "<input type=\"text\" name=\"client_identifier\" id=\"client_identifier\" value=\"{}\" \
         required placeholder=\"e.g., Jane's Laptop or aabbccddeeff\">",
        escape(identifier)
    )?;
    writeln!(html, "<button type=\"submit\">Search Organization</button>")?;
    writeln!(html, "</form>")
}

fn results_table(html: &mut String, identifier: &str, results: &[EnrichedClient]) -> fmt::Result {
    let identifier = escape(identifier);
    writeln!(html, "<h2>Results matching \"{}\"</h2>", identifier)?;

    if results.is_empty() {
        return writeln!(
            html,
            "<p>No clients found matching \"{}\" in the organization.</p>",
            identifier
        );
    }

    writeln!(html, "<p>Found {} matching clients.</p>", results.len())?;
    writeln!(html, "<table>")?;
    writeln!(
        html,
        "<thead><tr>\
         <th>Client Name/Hostname</th><th>MAC Address</th><th>Connected AP Name</th>\
         <th>Last Seen</th><th>Last IP Address</th>\
         </tr></thead>"
    )?;
    writeln!(html, "<tbody>")?;

    for client in results {
        let record = &client.record;
        writeln!(
            html,
            "<tr><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(record.display_name()),
            escape(&record.mac),
            escape(&client.ap_name),
            escape(&record.last_seen_or_na()),
            escape(record.last_ip_or_na()),
        )?;
    }

    writeln!(html, "</tbody>")?;
    writeln!(html, "</table>")
}

fn diagnostics_panel(html: &mut String, diagnostics: &Diagnostics<'_>) -> fmt::Result {
    writeln!(html, "<details id=\"diagnostics\">")?;
    writeln!(
        html,
        "<summary>Diagnostics: API Calls ({})</summary>",
        diagnostics.calls.len()
    )?;
    writeln!(html, "<ul>")?;
    writeln!(
        html,
        "<li>Configured Base URL: <code>{}</code></li>",
        escape(diagnostics.base_url)
    )?;
    writeln!(
        html,
        "<li>Configured Org ID: <code>{}</code></li>",
        escape(diagnostics.org_id)
    )?;

    if diagnostics.calls.is_empty() {
        writeln!(html, "<li>No API calls were made.</li>")?;
    }
    for (index, entry) in diagnostics.calls.entries().iter().enumerate() {
        let class = if entry.outcome.is_ok() { "ok" } else { "failed" };
        writeln!(
            html,
            "<li class=\"{}\">{} {}: <code>{}</code> ({})</li>",
            class,
            entry.kind.label(),
            index,
            escape(&entry.url),
            escape(&entry.outcome.to_string()),
        )?;
    }

    writeln!(html, "</ul>")?;
    writeln!(
        html,
        "<p>If you see a 404, double-check the Base URL and Org ID. \
         If you see a 403/Permission Error, verify the API token has Organization Read scope.</p>"
    )?;
    writeln!(html, "</details>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::types::ClientRecord;
    use crate::enrich::{CallKind, CallOutcome};

    fn jane() -> EnrichedClient {
        EnrichedClient::new(
            ClientRecord {
                mac: "aabbccddeeff".to_string(),
                last_hostname: Some("Jane's <Laptop>".to_string()),
                last_ap: Some("112233445566".to_string()),
                last_ip: None,
                timestamp: Some(1700000000.0),
            },
            "AP-Floor3".to_string(),
        )
    }

    #[test]
    fn test_escape() {
        assert!(matches!(escape("plain text"), Cow::Borrowed(_)));
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_empty_form() {
        let html = page(&PageView::default());

        assert!(html.contains("name=\"client_identifier\""));
        assert!(!html.contains("<table>"));
        assert!(!html.contains("API Error"));
        assert!(!html.contains("Diagnostics"));
    }

    #[test]
    fn test_page_one_element_per_line() {
        let results = [jane(), jane()];
        let html = page(&PageView {
            identifier: Some("jane"),
            results: Some(&results[..]),
            ..PageView::default()
        });

        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n"));
        assert!(html.ends_with("</body>\n</html>\n"));
        assert_eq!(html.lines().filter(|line| line.starts_with("<tr>")).count(), 2);
    }

    #[test]
    fn test_results_table_row() {
        let results = [jane()];
        let html = page(&PageView {
            identifier: Some("jane"),
            results: Some(&results[..]),
            ..PageView::default()
        });

        assert!(html.contains("value=\"jane\""));
        assert!(html.contains("Found 1 matching clients."));
        assert!(html.contains(
            "<tr><td>Jane&#039;s &lt;Laptop&gt;</td><td><code>aabbccddeeff</code></td>\
             <td>AP-Floor3</td><td>2023-11-14 22:13:20</td><td>N/A</td></tr>"
        ));
    }

    #[test]
    fn test_no_matches_message() {
        let results: Vec<EnrichedClient> = Vec::new();
        let html = page(&PageView {
            identifier: Some("nobody"),
            results: Some(results.as_slice()),
            ..PageView::default()
        });

        assert!(html.contains("No clients found matching \"nobody\" in the organization."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_error_and_diagnostics() {
        let mut calls = CallLog::new();
        calls.record(
            CallKind::ClientSearch,
            "https://api.mist.com/api/v1/orgs/o/clients/search?text=a&b",
            CallOutcome::Failed {
                kind: "api_status",
                message: "Not found".to_string(),
            },
        );

        let html = page(&PageView {
            identifier: Some("a&b"),
            error: Some("Organization Search Failed: Not found".to_string()),
            results: None,
            diagnostics: Some(Diagnostics {
                base_url: "https://api.mist.com/api/v1",
                org_id: "o",
                calls: &calls,
            }),
        });

        assert!(html.contains("<p>Organization Search Failed: Not found</p>"));
        assert!(html.contains("Diagnostics: API Calls (1)"));
        assert!(html.contains(
            "<li class=\"failed\">Client Search API 0: \
             <code>https://api.mist.com/api/v1/orgs/o/clients/search?text=a&amp;b</code> \
             (failed (api_status): Not found)</li>"
        ));
        assert!(!html.contains("Results matching"));
    }
}
