//! The single HTML page that drives the JSON API.
//!
//! The page is static: it carries no ledger data and is served without the app
//! password. The script in `static/app.js` logs in, then fetches everything
//! through the API.

use axum::response::{IntoResponse, Response};
use maud::{Markup, PreEscaped, html};

use crate::{
    APP_PASSWORD_HEADER, CategoryKind, DEFAULT_CATEGORIES, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, base,
        loading_spinner, password_input,
    },
};

const APP_SCRIPT: &str = include_str!("../static/app.js");
const APP_STYLE: &str = include_str!("../static/app.css");

/// Display the page.
pub async fn get_app_page() -> Response {
    let head_elements = [
        HeadElement::Style(PreEscaped(APP_STYLE.to_owned())),
        HeadElement::ScriptSource(PreEscaped(APP_SCRIPT.to_owned())),
    ];

    base("Spese di casa", &head_elements, &app_view()).into_response()
}

/// The names of the expense categories that get their own tab.
fn expense_tabs() -> impl Iterator<Item = &'static str> {
    DEFAULT_CATEGORIES
        .into_iter()
        .filter(|(_, kind)| *kind == CategoryKind::Expense)
        .map(|(name, _)| name)
}

fn app_view() -> Markup {
    html! {
        div
            id="app-root"
            class=(PAGE_CONTAINER_STYLE)
            data-password-header=(APP_PASSWORD_HEADER)
            data-login-endpoint=(endpoints::LOG_IN)
            data-balance-endpoint=(endpoints::BALANCE)
            data-movements-endpoint=(endpoints::MOVEMENTS)
            data-categories-endpoint=(endpoints::CATEGORIES)
        {
            (log_in_view())
            (main_view())
        }
    }
}

fn log_in_view() -> Markup {
    html! {
        section id="login-view" class="card narrow"
        {
            h1 { "Spese di casa" }

            form id="login-form" class="stack"
            {
                (password_input(None))

                button type="submit" id="login-button" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="indicator" { (loading_spinner()) }
                    "Accedi"
                }
            }
        }
    }
}

fn main_view() -> Markup {
    html! {
        section id="main-view" class="hidden"
        {
            header class="toolbar"
            {
                h1 { "Spese di casa" }

                label for="month" class=(FORM_LABEL_STYLE) { "Mese" }
                input type="month" id="month" name="month" class=(FORM_TEXT_INPUT_STYLE);

                button type="button" id="logout-button" class=(BUTTON_SECONDARY_STYLE) { "Esci" }
            }

            nav id="tabs" class="tabs"
            {
                button type="button" class="tab active" data-view="bilancio" { "Bilancio" }
                button type="button" class="tab" data-view="entrate" { "Entrate" }

                @for category in expense_tabs() {
                    button type="button" class="tab" data-view="categoria" data-category=(category)
                    {
                        (category)
                    }
                }
            }

            (dashboard_view())
            (list_view())
            (add_transaction_form())
        }
    }
}

fn dashboard_view() -> Markup {
    html! {
        section id="dashboard-view"
        {
            div class="cards"
            {
                div class="card"
                {
                    p class="card-label" { "Entrate" }
                    p id="total-income" class="card-value income" { "-" }
                }
                div class="card"
                {
                    p class="card-label" { "Uscite" }
                    p id="total-expense" class="card-value expense" { "-" }
                }
                div class="card"
                {
                    p class="card-label" { "Saldo" }
                    p id="balance" class="card-value" { "-" }
                }
            }

            div class="card"
            {
                h2 { "Report" }

                div class="report-buttons"
                {
                    (report_button("report-summary", endpoints::REPORT, "Report sintetico"))
                    (report_button("report-detail", endpoints::REPORT_DETAIL, "Report dettaglio"))
                    (report_button("report-chart", endpoints::REPORT_CHART, "Grafico spese"))
                }

                p id="report-status" class="report-status" {}
            }
        }
    }
}

fn report_button(id: &str, endpoint: &str, label: &str) -> Markup {
    html! {
        button type="button" id=(id) class=(BUTTON_PRIMARY_STYLE) data-report-endpoint=(endpoint)
        {
            span class="indicator" { (loading_spinner()) }
            (label)
        }
    }
}

fn list_view() -> Markup {
    html! {
        section id="list-view" class="card hidden"
        {
            h2 id="list-title" {}

            table class="table"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th class=(TABLE_CELL_STYLE) { "Data" }
                        th class=(TABLE_CELL_STYLE) { "Importo" }
                        th class=(TABLE_CELL_STYLE) { "Nota" }
                        th class=(TABLE_CELL_STYLE) { "Categoria" }
                        th class=(TABLE_CELL_STYLE) {}
                    }
                }

                tbody id="list-rows" {}

                tfoot
                {
                    tr
                    {
                        th class=(TABLE_CELL_STYLE) { "Totale" }
                        th id="list-total" class=(TABLE_CELL_STYLE) {}
                        th class=(TABLE_CELL_STYLE) colspan="3" {}
                    }
                }
            }
        }
    }
}

fn add_transaction_form() -> Markup {
    html! {
        section class="card"
        {
            h2 { "Nuovo movimento" }

            form id="add-form" class="form-grid"
            {
                div
                {
                    label for="add-date" class=(FORM_LABEL_STYLE) { "Data" }
                    input type="date" id="add-date" name="data" class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="add-category" class=(FORM_LABEL_STYLE) { "Categoria" }
                    select id="add-category" name="categoria" class=(FORM_TEXT_INPUT_STYLE) required {}
                }

                div
                {
                    label for="add-amount" class=(FORM_LABEL_STYLE) { "Importo (€)" }
                    input
                        type="number"
                        id="add-amount"
                        name="importo"
                        min="0"
                        step="0.01"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label for="add-note" class=(FORM_LABEL_STYLE) { "Nota" }
                    input type="text" id="add-note" name="nota" class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" id="add-button" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="indicator" { (loading_spinner()) }
                    "Aggiungi"
                }
            }
        }
    }
}
