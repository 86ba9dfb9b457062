//! Server-rendered HTML for the public and admin pages.

use std::fmt::Write;

use food_grader::grading::{Food, FoodReport, GradeLabel, GradedIngredient, Ingredient};

/// What a form page shows after a submission.
pub(crate) enum Outcome<'a, T> {
    Blank,
    Errors(&'a [String]),
    Created(&'a T),
}

pub(crate) fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub(crate) fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Ingredient Grader</title>
<link rel="stylesheet" href="/public/css/site.css">
<script src="/public/js/food.js" defer></script>
</head>
<body>
<nav class="site-nav">
<a href="/">Ingredient Grader</a>
<a href="/food">Search Food</a>
<a href="/about">About</a>
<a href="/admin/food/create">Add Food</a>
<a href="/admin/ingredient/create">Add Ingredient</a>
</nav>
<main class="container">
{content}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn alerts(errors: &[String]) -> String {
    let mut html = String::new();
    for error in errors {
        let _ = writeln!(
            html,
            r#"<div class="alert alert-danger" role="alert">{}</div>"#,
            escape(error)
        );
    }
    html
}

fn grade_class(grade: Option<i8>) -> &'static str {
    match grade {
        Some(grade) if grade < -3 => "table-danger",
        Some(grade) if grade > 3 => "table-success",
        Some(_) => "table-default",
        None => "table-warning",
    }
}

fn label_class(label: GradeLabel) -> &'static str {
    match label {
        GradeLabel::VeryBad | GradeLabel::Bad => "grade-bad",
        GradeLabel::Neutral => "grade-neutral",
        GradeLabel::Good | GradeLabel::VeryGood => "grade-good",
        GradeLabel::Missing => "grade-missing",
    }
}

const SEARCH_FORM: &str = r#"<form method="get" action="/food" class="search">
<label for="barcode">Barcode</label>
<input id="barcode" name="barcode" inputmode="numeric" autofocus>
<button type="submit">Search</button>
</form>"#;

pub(crate) fn food_search(errors: &[String]) -> String {
    let content = format!("<h1>Search Food</h1>\n{}{SEARCH_FORM}", alerts(errors));
    layout("Search Food", &content)
}

pub(crate) fn food_report(report: &FoodReport) -> String {
    let food = &report.food;
    let mut content = String::from("<h1>Search Food</h1>\n");

    if report.missing_graded_ingredients() {
        content.push_str(&alerts(&[format!(
            "{} is missing graded ingredients",
            food.name
        )]));
    }

    content.push_str(SEARCH_FORM);
    content.push_str(&food_summary(food));
    content.push_str(&ingredient_table(&report.ingredients));

    layout(&food.name, &content)
}

fn food_summary(food: &Food) -> String {
    let numeric = if food.is_missing_ingredients() {
        "n/a".to_string()
    } else {
        format!("{:.2}", food.numgrade)
    };

    format!(
        r#"<section class="food">
<h2>{name}</h2>
<dl>
<dt>Barcode</dt><dd>{barcode}</dd>
<dt>Grade</dt><dd class="{class}">{label}</dd>
<dt>Average</dt><dd>{numeric}</dd>
</dl>
</section>
"#,
        name = escape(&food.name),
        barcode = escape(food.barcode.as_str()),
        class = label_class(food.grade),
        label = food.grade.label(),
    )
}

fn ingredient_table(ingredients: &[GradedIngredient]) -> String {
    let mut rows = String::new();
    for ingredient in ingredients {
        let grade = ingredient.grade.map(|grade| grade.value());
        let shown = grade
            .map(|grade| grade.to_string())
            .unwrap_or_else(|| "ungraded".to_string());
        let _ = writeln!(
            rows,
            r#"<tr class="rowEntry {class}"><td class="name">{name}</td><td class="grade">{shown}</td></tr>"#,
            class = grade_class(grade),
            name = escape(ingredient.name.as_str()),
        );
    }

    format!(
        r#"<table class="table ingredients">
<thead><tr><th id="name">Ingredient</th><th id="grade">Grade</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
"#
    )
}

pub(crate) fn food_not_found(barcode: &str) -> String {
    food_search(&[format!(
        "There is no food associated with barcode: {barcode}"
    )])
}

const FOOD_FORM: &str = r#"<form method="post" action="/admin/food/create">
<label for="barcode">Barcode</label>
<input id="barcode" name="barcode" inputmode="numeric">
<label for="name">Name</label>
<input id="name" name="name">
<label for="ingredients">Ingredients (comma separated)</label>
<textarea id="ingredients" name="ingredients" rows="4"></textarea>
<button type="submit">Create Food</button>
</form>"#;

pub(crate) fn make_food(outcome: Outcome<'_, Food>) -> String {
    let mut content = String::from("<h1>Add Food</h1>\n");
    match outcome {
        Outcome::Blank => {}
        Outcome::Errors(errors) => content.push_str(&alerts(errors)),
        Outcome::Created(food) => {
            let _ = writeln!(
                content,
                r#"<div class="alert alert-success" role="status">Created {} with grade {}</div>"#,
                escape(&food.name),
                food.grade.label()
            );
            content.push_str(&food_summary(food));
        }
    }
    content.push_str(FOOD_FORM);
    layout("Add Food", &content)
}

const INGREDIENT_FORM: &str = r#"<form method="post" action="/admin/ingredient/create">
<label for="name">Name</label>
<input id="name" name="name">
<label for="grade">Grade (-5 to 5)</label>
<input id="grade" name="grade" type="number" min="-5" max="5" step="1">
<button type="submit">Create Ingredient</button>
</form>"#;

pub(crate) fn make_ingredient(outcome: Outcome<'_, Ingredient>) -> String {
    let mut content = String::from("<h1>Add Ingredient</h1>\n");
    match outcome {
        Outcome::Blank => {}
        Outcome::Errors(errors) => content.push_str(&alerts(errors)),
        Outcome::Created(ingredient) => {
            let _ = writeln!(
                content,
                r#"<div class="alert alert-success" role="status">Created ingredient {} with grade {}</div>"#,
                escape(ingredient.name.as_str()),
                ingredient.grade
            );
        }
    }
    content.push_str(INGREDIENT_FORM);
    layout("Add Ingredient", &content)
}

pub(crate) fn landing() -> String {
    let content = format!(
        r#"<h1>How healthy is it?</h1>
<p>Scan or type the barcode of a packaged food to see its ingredients and a grade derived from them.</p>
{SEARCH_FORM}"#
    );
    layout("Home", &content)
}

pub(crate) fn about() -> String {
    let content = r#"<h1>About</h1>
<p>Every ingredient carries a grade from -5 (very unhealthy) to 5 (very healthy).
A food's grade is the average of its ingredients' grades:</p>
<ul>
<li>below -3: very bad</li>
<li>-3 up to -1: bad</li>
<li>-1 up to 1: neutral</li>
<li>1 up to 3: good</li>
<li>3 up to 5: very good</li>
</ul>
<p>If any ingredient has not been graded yet the food is marked as missing until an administrator grades it.</p>"#;
    layout("About", content)
}

pub(crate) fn not_found() -> String {
    layout(
        "Not Found",
        r#"<h1>Page not found</h1>
<p>The page you requested does not exist. <a href="/">Return home</a>.</p>"#,
    )
}

pub(crate) fn server_error() -> String {
    layout(
        "Error",
        r#"<h1>Something went wrong</h1>
<p>The catalog could not be reached. Please try again shortly.</p>"#,
    )
}
