//! Inventory dashboard page and its form posts
//!
//! Forms answer with a 303 back to `/`; the outcome travels as a flash
//! message shown once on the next render.

use axum::{
    extract::{Query, State},
    response::{Html, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use dashkit_common::html::{escape, render_flash, render_notice, render_page, Page};
use dashkit_common::{BuildInfo, Flash, FlashLevel, SessionId};
use tracing::warn;

use crate::charts::{bar_chart_svg, pie_chart_svg};
use crate::model::{
    Category, NewProduct, Product, StockStatus, DEFAULT_QUANTITY, DEFAULT_REORDER_LEVEL,
};
use crate::session::InventorySession;
use crate::store::InventoryStore;
use crate::summary::{
    low_stock_alerts, quantity_by_category, summarize, InventorySummary, ProductFilter,
};
use crate::AppState;

/// GET /
pub async fn dashboard_page(
    State(state): State<AppState>,
    session: SessionId,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let (filter, filter_error) = match ProductFilter::from_query_pairs(&params) {
        Ok(filter) => (filter, None),
        Err(e) => {
            warn!("Ignoring filter: {}", e);
            (ProductFilter::all(), Some(e.to_string()))
        }
    };

    let build = crate::build_info();
    let html = state
        .with_inventory(session.id(), |s| {
            let flash = s.take_flash().or_else(|| filter_error.map(Flash::warning));
            render_dashboard(&build, s, &filter, flash.as_ref())
        })
        .await;

    session.attach(Html(html))
}

/// POST /products
pub async fn add_product(
    State(state): State<AppState>,
    session: SessionId,
    Form(new): Form<NewProduct>,
) -> Response {
    state
        .with_inventory(session.id(), |s| {
            s.flash = Some(match s.store.add_product(new) {
                Ok(product) => {
                    Flash::success(format!("Product '{}' added successfully!", product.name))
                }
                Err(e) => Flash::error(e.to_string()),
            });
        })
        .await;

    session.attach(Redirect::to("/"))
}

/// POST /sample
pub async fn regenerate_sample(State(state): State<AppState>, session: SessionId) -> Response {
    let count = state.sample_size;
    state
        .with_inventory(session.id(), |s| {
            let mut rng = rand::thread_rng();
            s.store.regenerate_sample(count, &mut rng);
            s.flash = Some(Flash::info(format!("Generated {} sample products", count)));
        })
        .await;

    session.attach(Redirect::to("/"))
}

/// POST /clear
pub async fn clear_all(State(state): State<AppState>, session: SessionId) -> Response {
    state
        .with_inventory(session.id(), |s| {
            s.store.clear();
            s.flash = Some(Flash::info("All inventory data cleared"));
        })
        .await;

    session.attach(Redirect::to("/"))
}

/// Build dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/products", post(add_product))
        .route("/sample", post(regenerate_sample))
        .route("/clear", post(clear_all))
}

fn render_dashboard(
    build: &BuildInfo,
    session: &InventorySession,
    filter: &ProductFilter,
    flash: Option<&Flash>,
) -> String {
    let products = session.store.products();
    let mut body = render_flash(flash);

    match summarize(products) {
        None => body.push_str(&render_notice(
            FlashLevel::Warning,
            "No inventory data available. Please add products or generate sample data.",
        )),
        Some(summary) => {
            body.push_str(&render_summary_cards(&summary));
            body.push_str(&format!(
                r#"<div class="columns">
    <section class="panel">{table}</section>
    <section class="panel">{charts}</section>
</div>
"#,
                table = render_inventory_table(products, filter),
                charts = render_charts(products),
            ));
        }
    }

    render_page(&Page {
        title: "📦 Inventory Management Dashboard",
        subtitle: "Track stock levels, categories and low-stock alerts",
        build,
        sidebar: Some(render_sidebar(&session.store)),
        body,
    })
}

fn render_sidebar(store: &InventoryStore) -> String {
    let categories: String = Category::ALL
        .iter()
        .map(|c| format!(r#"<option value="{0}">{0}</option>"#, c.as_str()))
        .collect();

    format!(
        r#"<h2>📦 Product Management</h2>
<div class="panel">
    <h3>➕ Add New Product</h3>
    <form action="/products" method="post">
        <label>Product ID <input type="text" value="{next_id}" disabled></label>
        <label>Product Name <input type="text" name="name" placeholder="Enter product name"></label>
        <label>Category <select name="category">{categories}</select></label>
        <label>Quantity Available <input type="number" name="quantity_available" min="0" step="1" value="{quantity}"></label>
        <label title="Minimum quantity before reordering is needed">Reorder Level <input type="number" name="reorder_level" min="0" step="1" value="{reorder}"></label>
        <button class="button" type="submit">Add Product</button>
    </form>
</div>
<div class="panel">
    <h3>⚙️ Data Options</h3>
    <form action="/sample" method="post">
        <button class="button button-secondary" type="submit">🔄 Generate Sample Data</button>
    </form>
    <form action="/clear" method="post">
        <button class="button button-danger" type="submit">🗑️ Clear All Data</button>
    </form>
</div>
"#,
        next_id = store.next_product_id(),
        categories = categories,
        quantity = DEFAULT_QUANTITY,
        reorder = DEFAULT_REORDER_LEVEL,
    )
}

fn render_summary_cards(summary: &InventorySummary) -> String {
    let card = |label: &str, value: String| {
        format!(
            r#"<div class="metric"><div class="metric-label">{}</div><div class="metric-value">{}</div></div>"#,
            label, value
        )
    };

    format!(
        r#"<div class="metrics">{}{}{}{}</div>"#,
        card("Total Products", summary.total_products.to_string()),
        card("Total Quantity", summary.total_quantity.to_string()),
        card("Low Stock Items", summary.low_stock_count.to_string()),
        card("Categories", summary.category_count.to_string()),
    )
}

/// Categories in order of first appearance
fn categories_present(products: &[Product]) -> Vec<Category> {
    let mut seen = Vec::new();
    for product in products {
        if !seen.contains(&product.category) {
            seen.push(product.category);
        }
    }
    seen
}

fn render_inventory_table(products: &[Product], filter: &ProductFilter) -> String {
    let category_boxes: String = categories_present(products)
        .into_iter()
        .map(|c| {
            format!(
                r#"<label class="checkbox-label"><input type="checkbox" name="category" value="{0}"{1}> {0}</label>"#,
                c.as_str(),
                if filter.includes_category(c) { " checked" } else { "" }
            )
        })
        .collect();
    let status_boxes: String = StockStatus::ALL
        .iter()
        .map(|s| {
            format!(
                r#"<label class="checkbox-label"><input type="checkbox" name="status" value="{0}"{1}> {0}</label>"#,
                s.as_str(),
                if filter.includes_status(*s) { " checked" } else { "" }
            )
        })
        .collect();

    let shown = filter.apply(products);
    let rows: String = shown
        .iter()
        .map(|p| {
            let status = p.status();
            format!(
                r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class="{}">{}</td></tr>"#,
                escape(&p.id),
                escape(&p.name),
                p.category,
                p.quantity_available,
                p.reorder_level,
                status.css_class(),
                status
            )
        })
        .collect();

    format!(
        r#"<h2>📋 Inventory Overview</h2>
<form class="filters" action="/" method="get">
    <input type="hidden" name="filter" value="1">
    <fieldset><legend>Filter by Category</legend>{category_boxes}</fieldset>
    <fieldset><legend>Filter by Status</legend>{status_boxes}</fieldset>
    <button class="button button-secondary" type="submit">Apply</button>
</form>
<p class="caption">Showing {shown} of {total} products</p>
<table class="data">
    <thead><tr><th>ProductID</th><th>Name</th><th>Category</th><th>QuantityAvailable</th><th>ReorderLevel</th><th>Status</th></tr></thead>
    <tbody>{rows}</tbody>
</table>
"#,
        category_boxes = category_boxes,
        status_boxes = status_boxes,
        shown = shown.len(),
        total = products.len(),
        rows = rows,
    )
}

fn render_charts(products: &[Product]) -> String {
    let totals = quantity_by_category(products);
    format!(
        r#"<h2>📊 Stock Proportion by Category</h2>
{pie}
<h2>📈 Total Quantity by Category</h2>
{bar}
<hr>
{alerts}
"#,
        pie = pie_chart_svg(&totals),
        bar = bar_chart_svg(&totals),
        alerts = render_alerts(products),
    )
}

fn render_alerts(products: &[Product]) -> String {
    let alerts = low_stock_alerts(products);
    if alerts.is_empty() {
        return format!(
            "<h2>🚨 Low Stock Alerts</h2>{}",
            render_notice(FlashLevel::Success, "🎉 All products are sufficiently stocked!")
        );
    }

    let cards: String = alerts
        .iter()
        .map(|a| {
            format!(
                r#"<div class="alert-card">
    <strong>{name}</strong> ({id})
    <div class="progress"><div class="progress-bar" style="width: {percent:.0}%"></div></div>
    <div>{quantity}/{reorder} units remaining</div>
    <div class="caption">Category: {category}</div>
</div>"#,
                name = escape(&a.name),
                id = escape(&a.id),
                percent = a.fill_ratio * 100.0,
                quantity = a.quantity_available,
                reorder = a.reorder_level,
                category = a.category,
            )
        })
        .collect();

    format!(
        r#"<h2>🚨 Low Stock Alerts</h2><div class="alert-grid">{}</div>"#,
        cards
    )
}
