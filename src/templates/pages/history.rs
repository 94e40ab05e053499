use crate::db::evaluations::EvaluationSummary;
use crate::templates::desktop_layout;
use chrono::DateTime;
use maud::{html, Markup};

fn saved_at(created_at: i64) -> String {
    DateTime::from_timestamp(created_at, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default()
}

pub fn history_page(rows: &[EvaluationSummary]) -> Markup {
    desktop_layout(
        "History",
        html! {
            main class="container" {
                h1 { "Your evaluations" }

                @if rows.is_empty() {
                    p class="muted" {
                        "Nothing saved yet. "
                        a href="/" { "Evaluate a property" }
                        " and it will show up here."
                    }
                } @else {
                    table class="history" {
                        thead {
                            tr { th { "Property" } th { "Type" } th { "Saved" } th {} }
                        }
                        tbody {
                            @for row in rows {
                                tr {
                                    td { a href=(format!("/evaluations/{}", row.id)) { (row.address) } }
                                    td { (row.flow.title()) }
                                    td { (saved_at(row.created_at)) }
                                    td {
                                        form method="post" action=(format!("/evaluations/{}/delete", row.id)) class="inline" {
                                            button type="submit" class="link danger" { "Delete" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Flow;

    #[test]
    fn formats_unix_seconds() {
        assert_eq!(saved_at(0), "1970-01-01 00:00 UTC");
        assert_eq!(saved_at(1_700_000_000), "2023-11-14 22:13 UTC");
    }

    #[test]
    fn rows_link_to_results() {
        let rows = vec![EvaluationSummary {
            id: "abc".into(),
            flow: Flow::Sell,
            address: "3 Bay St".into(),
            created_at: 0,
        }];
        let html = history_page(&rows).into_string();
        assert!(html.contains(r#"href="/evaluations/abc""#));
        assert!(html.contains("Sell Evaluation"));
        assert!(html.contains(r#"action="/evaluations/abc/delete""#));
    }
}
