use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Property Evaluator" }
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="topbar" {
                    a href="/" class="brand" { "Property Evaluator" }
                    nav {
                        ul {
                            li { a href="/" { "Home" } }
                            li { a href="/history" { "History" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
