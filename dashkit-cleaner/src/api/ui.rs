//! Missing Data Cleaner page
//!
//! Server-rendered: every form posts back and redirects here, so this page
//! always reflects the session as it stands.

use axum::{
    extract::State,
    response::{Html, Response},
    routing::get,
    Router,
};
use dashkit_common::html::{escape, render_flash, render_notice, render_page, Page};
use dashkit_common::{Flash, FlashLevel, SessionId};

use crate::impute::{FillMethod, ImputationReport};
use crate::report::MissingReport;
use crate::session::{CleanOptions, CleanerSession, Dataset, CLEANED_FILE_NAME};
use crate::table::{example_dataset, ColumnData, ColumnType, Table};
use crate::AppState;

/// Rows rendered per table; the download always carries every row
pub const DISPLAY_ROW_LIMIT: usize = 500;

const MATRIX_WIDTH: f64 = 640.0;
const MATRIX_MAX_HEIGHT: f64 = 320.0;
const MATRIX_LABEL_HEIGHT: f64 = 24.0;
/// Longer tables are bucketed so each strip covers several rows
const MATRIX_MAX_STRIPS: usize = 320;
const PRESENT_FILL: &str = "#4a9eff";
const MISSING_FILL: &str = "#f5f5f5";

/// GET /
pub async fn index_page(State(state): State<AppState>, session: SessionId) -> Response {
    let build = crate::build_info();
    let html = state
        .sessions
        .with_session(session.id(), CleanerSession::default, |s| {
            let flash = s.take_flash();
            render_index(&build, s, flash.as_ref())
        })
        .await;

    session.attach(Html(html))
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(index_page))
}

fn render_index(
    build: &dashkit_common::BuildInfo,
    session: &CleanerSession,
    flash: Option<&Flash>,
) -> String {
    let mut body = render_flash(flash);

    match &session.dataset {
        Some(dataset) => {
            body.push_str(&render_dataset(dataset));
            if let Some(report) = &session.result {
                body.push_str(&render_result(report, &session.options));
            }
        }
        None => body.push_str(&render_welcome()),
    }

    body.push_str(
        r#"<hr>
<footer class="subtitle">📊 Missing Data Cleaner: fill gaps with a column's mean, median or mode</footer>"#,
    );

    render_page(&Page {
        title: "🧹 Missing Data Cleaner",
        subtitle: "Upload a CSV file, fill its missing values and download the cleaned dataset",
        build,
        sidebar: Some(render_sidebar(session)),
        body,
    })
}

fn render_sidebar(session: &CleanerSession) -> String {
    let mut html = String::from(
        r#"<h2>📁 Upload &amp; Settings</h2>
<form action="/upload" method="post" enctype="multipart/form-data">
    <label>Choose a CSV file
        <input type="file" name="file" accept=".csv,text/csv">
    </label>
    <button class="button" type="submit">Upload</button>
</form>
"#,
    );

    if let Some(dataset) = &session.dataset {
        html.push_str(&render_dataset_info(dataset));
    }

    let options = &session.options;
    let methods: String = FillMethod::ALL
        .iter()
        .map(|method| {
            format!(
                r#"<label class="checkbox-label"><input type="radio" name="method" value="{}"{}> {}</label>"#,
                method.as_str(),
                if *method == options.method { " checked" } else { "" },
                method.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html.push_str(&format!(
        r#"<form id="clean-form" action="/clean" method="post">
    <h3>Filling Method</h3>
    {methods}
    <h3>Options</h3>
    <label class="checkbox-label"><input type="checkbox" name="exclude_non_numeric"{exclude}> Exclude non-numeric columns</label>
    <label class="checkbox-label"><input type="checkbox" name="show_download"{download}> Show download button</label>
</form>
"#,
        methods = methods,
        exclude = checked(options.exclude_non_numeric),
        download = checked(options.show_download),
    ));

    html
}

fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}

fn render_dataset_info(dataset: &Dataset) -> String {
    let report = MissingReport::from_table(&dataset.table);

    let per_column: String = report
        .columns_with_missing()
        .map(|c| format!("<li>{}: {} missing values</li>", escape(&c.name), c.missing))
        .collect();
    let per_column = if per_column.is_empty() {
        "<p>No missing values.</p>".to_string()
    } else {
        format!("<p>Missing values per column:</p><ul>{}</ul>", per_column)
    };

    format!(
        r#"<div class="panel">
    <h3>Dataset Info</h3>
    <p>{file}</p>
    <p>Shape: {rows} rows, {columns} columns</p>
    {per_column}
</div>
"#,
        file = escape(&dataset.file_name),
        rows = report.rows,
        columns = report.columns,
        per_column = per_column,
    )
}

fn render_dataset(dataset: &Dataset) -> String {
    format!(
        r#"<section class="panel">
    <h2>Original Dataset</h2>
    {table}
    <h3>Missing Values Visualization</h3>
    {matrix}
    <button class="button" type="submit" form="clean-form">🪄 Clean Data</button>
</section>
"#,
        table = render_table(&dataset.table),
        matrix = render_missing_matrix(&dataset.table),
    )
}

fn render_result(report: &ImputationReport, options: &CleanOptions) -> String {
    let notice = if report.is_complete() {
        render_notice(FlashLevel::Success, "All missing values have been filled!")
    } else {
        render_notice(
            FlashLevel::Warning,
            &format!(
                "There are still {} missing values that couldn't be filled with the selected method.",
                report.remaining_missing
            ),
        )
    };

    let fills: String = report
        .filled
        .iter()
        .map(|f| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&f.column),
                escape(&f.value.to_string()),
                f.cells_filled
            )
        })
        .collect();
    let fills = if fills.is_empty() {
        String::new()
    } else {
        format!(
            r#"<table class="data"><thead><tr><th>Column</th><th>Fill value</th><th>Cells filled</th></tr></thead><tbody>{}</tbody></table>"#,
            fills
        )
    };

    let skipped: String = report
        .skipped
        .iter()
        .map(|s| {
            format!(
                "<li>{}: {} missing, {}</li>",
                escape(&s.column),
                s.missing,
                s.reason.describe()
            )
        })
        .collect();
    let skipped = if skipped.is_empty() {
        String::new()
    } else {
        format!("<p>Columns left unfilled:</p><ul>{}</ul>", skipped)
    };

    let download = if options.show_download {
        format!(
            r#"<p><a class="button" href="/download" download="{name}">⬇️ Download Cleaned Dataset</a></p>"#,
            name = CLEANED_FILE_NAME
        )
    } else {
        String::new()
    };

    format!(
        r#"<section class="panel">
    <h2>Cleaned Dataset</h2>
    <p class="subtitle">Filled with the {method}</p>
    {table}
    {notice}
    {fills}
    {skipped}
    {download}
</section>
"#,
        method = report.options.method.label().to_lowercase(),
        table = render_table(&report.table),
        notice = notice,
        fills = fills,
        skipped = skipped,
        download = download,
    )
}

fn render_welcome() -> String {
    format!(
        r#"{notice}
<section class="panel">
    <h2>Example Dataset</h2>
    <p>Upload a CSV file shaped like this one; blank cells count as missing.</p>
    {example}
</section>
<section class="panel">
    <h2>How to use</h2>
    <ol>
        <li>Upload a CSV file from the sidebar</li>
        <li>Review the missing values per column</li>
        <li>Choose a filling method and options</li>
        <li>Click Clean Data</li>
        <li>Download the cleaned dataset</li>
    </ol>
</section>
"#,
        notice = render_notice(FlashLevel::Info, "👈 Please upload a CSV file to get started"),
        example = render_table(&example_dataset()),
    )
}

/// HTML table of the first [`DISPLAY_ROW_LIMIT`] rows
pub fn render_table(table: &Table) -> String {
    let header: String = table
        .columns()
        .iter()
        .map(|c| {
            format!(
                r#"<th title="{}">{}</th>"#,
                c.column_type(),
                escape(c.name())
            )
        })
        .collect();

    let shown = table.row_count().min(DISPLAY_ROW_LIMIT);
    let mut rows = String::new();
    for row in 0..shown {
        rows.push_str("<tr>");
        for column in table.columns() {
            match column.data().display(row) {
                Some(value) => rows.push_str(&format!("<td>{}</td>", escape(&value))),
                None => rows.push_str(r#"<td class="missing">NaN</td>"#),
            }
        }
        rows.push_str("</tr>");
    }

    let caption = if table.row_count() > shown {
        format!(
            r#"<p class="subtitle">Showing the first {} of {} rows</p>"#,
            shown,
            table.row_count()
        )
    } else {
        String::new()
    };

    format!(
        r#"<table class="data"><thead><tr>{}</tr></thead><tbody>{}</tbody></table>{}"#,
        header, rows, caption
    )
}

/// SVG matrix with one strip per row and one cell per column
///
/// Present cells are shaded, missing cells left light. Past
/// [`MATRIX_MAX_STRIPS`] rows, each strip covers a bucket of rows and is
/// light when any row in it has a gap. Adjacent light strips in a column
/// are drawn as one rect.
pub fn render_missing_matrix(table: &Table) -> String {
    let rows = table.row_count();
    let columns = table.column_count();
    if rows == 0 || columns == 0 {
        return render_notice(FlashLevel::Info, "No rows to visualize");
    }

    let strips = rows.min(MATRIX_MAX_STRIPS);
    let cell_width = MATRIX_WIDTH / columns as f64;
    let strip_height = (MATRIX_MAX_HEIGHT / strips as f64).min(12.0);
    let height = MATRIX_LABEL_HEIGHT + strip_height * strips as f64;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="missing-matrix" width="{w}" height="{h:.1}" viewBox="0 0 {w} {h:.1}" role="img" aria-label="Missing values matrix">"#,
        w = MATRIX_WIDTH,
        h = height
    );
    svg.push_str(&format!(
        r#"<rect x="0" y="{y}" width="{w}" height="{h:.1}" fill="{fill}"/>"#,
        y = MATRIX_LABEL_HEIGHT,
        w = MATRIX_WIDTH,
        h = strip_height * strips as f64,
        fill = PRESENT_FILL
    ));

    for (index, column) in table.columns().iter().enumerate() {
        let x = cell_width * index as f64;
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="16" font-size="11" fill="#e0e0e0" text-anchor="middle">{}</text>"##,
            x + cell_width / 2.0,
            escape(&truncate_label(column.name(), 14))
        ));

        for (start, len) in missing_runs(column.data(), rows, strips) {
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                x,
                MATRIX_LABEL_HEIGHT + strip_height * start as f64,
                cell_width,
                strip_height * len as f64,
                MISSING_FILL
            ));
        }
    }

    svg.push_str("</svg>");

    let numeric = table
        .columns()
        .iter()
        .filter(|c| c.column_type() == ColumnType::Numeric)
        .count();
    format!(
        r#"{svg}<p class="subtitle">{missing} missing cells across {columns} columns ({numeric} numeric); light cells are missing</p>"#,
        svg = svg,
        missing = table.missing_count(),
        columns = columns,
        numeric = numeric
    )
}

/// `(first strip, strip count)` runs of strips holding at least one gap
fn missing_runs(data: &ColumnData, rows: usize, strips: usize) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for strip in 0..strips {
        let first = strip * rows / strips;
        let last = (strip + 1) * rows / strips;
        if !(first..last).any(|row| data.is_missing(row)) {
            continue;
        }
        match runs.last_mut() {
            Some((start, len)) if *start + *len == strip => *len += 1,
            _ => runs.push((strip, 1)),
        }
    }
    runs
}

fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let mut short: String = label.chars().take(max - 1).collect();
        short.push('…');
        short
    }
}
