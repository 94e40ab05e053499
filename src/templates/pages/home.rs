// templates/pages/home.rs

use crate::domain::Flow;
use crate::templates::{card, desktop_layout};
use maud::{html, Markup};

fn blurb(flow: Flow) -> &'static str {
    match flow {
        Flow::Rent => "Is the asking rent fair for the area, and how fast do rentals move?",
        Flow::Buy => "Price position, monthly cost of ownership, and red flags before you offer.",
        Flow::Sell => "A suggested list price from recent sales, adjusted for the season.",
        Flow::Investment => "Cap rate, cash-on-cash return and NOI under your own assumptions.",
    }
}

pub fn home_page() -> Markup {
    desktop_layout(
        "Home",
        html! {
            main class="container" {
                h1 { "Evaluate a property" }
                p class="lead" {
                    "Paste a listing URL or type an address, pick what you want to know, "
                    "and get a market-backed verdict."
                }

                div class="flow-grid" {
                    @for flow in Flow::ALL {
                        a class="flow-link" href=(format!("/evaluate/{}", flow.as_str())) {
                            (card(flow.title(), html! { p { (blurb(flow)) } }))
                        }
                    }
                }

                p class="muted" {
                    "Works without any API keys. With data-provider and AI credentials "
                    "configured, figures and summaries come from live services."
                }
            }
        },
    )
}
