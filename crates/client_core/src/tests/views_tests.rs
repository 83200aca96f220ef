use super::*;
use shared::domain::{ExpressionId, Scalar, TaskId};

fn expression(id: &str, status: &str, result: Option<f64>) -> Expression {
    Expression {
        id: ExpressionId::new(id),
        status: Some(Scalar::from(status)),
        result: result.map(Scalar::from),
    }
}

fn task(id: &str, is_busy: bool) -> Task {
    Task {
        id: TaskId::new(id),
        arg1: Some(Scalar::from(2.0)),
        arg2: Some(Scalar::from(0.5)),
        operation: Some(Scalar::from("*")),
        operation_time: Some(Scalar::from(100.0)),
        is_busy,
    }
}

fn cells(values: &[&str]) -> Row {
    Row::Cells(values.iter().map(|v| v.to_string()).collect())
}

#[test]
fn absent_expressions_render_one_spanning_placeholder() {
    let mut view = TableView::expressions();
    CollectionRenderer::default().render_expressions(&mut view, &Listing::NotFound);

    assert_eq!(
        view.rows(),
        &[Row::Placeholder {
            text: "No expressions".to_string(),
            span: 3,
        }]
    );
}

#[test]
fn expressions_map_positionally_one_row_each() {
    let mut view = TableView::expressions();
    let listing = Listing::Found(vec![
        expression("e1", "running", None),
        expression("e2", "ok", Some(4.0)),
    ]);
    CollectionRenderer::default().render_expressions(&mut view, &listing);

    assert_eq!(
        view.rows(),
        &[cells(&["e1", "running", ""]), cells(&["e2", "ok", "4"])]
    );
}

#[test]
fn empty_expression_listing_renders_no_rows() {
    let mut view = TableView::expressions();
    CollectionRenderer::default().render_expressions(&mut view, &Listing::Found(Vec::new()));
    assert!(view.rows().is_empty());
}

#[test]
fn empty_task_queue_renders_no_placeholder() {
    let mut view = TableView::tasks();
    let renderer = CollectionRenderer::default();
    renderer.render_tasks(&mut view, &[task("t1", false)]);
    renderer.render_tasks(&mut view, &[]);

    assert!(view.rows().is_empty());
}

#[test]
fn busy_flag_renders_as_localized_yes_no() {
    let mut view = TableView::tasks();
    CollectionRenderer::new(Locale::English)
        .render_tasks(&mut view, &[task("t1", true), task("t2", false)]);
    assert_eq!(
        view.rows(),
        &[
            cells(&["t1", "2", "0.5", "*", "100", "Yes"]),
            cells(&["t2", "2", "0.5", "*", "100", "No"]),
        ]
    );

    CollectionRenderer::new(Locale::Russian).render_tasks(&mut view, &[task("t3", true)]);
    assert_eq!(view.rows(), &[cells(&["t3", "2", "0.5", "*", "100", "Да"])]);
}

#[test]
fn rendering_replaces_rows_wholesale() {
    let mut view = TableView::expressions();
    let renderer = CollectionRenderer::default();
    renderer.render_expressions(
        &mut view,
        &Listing::Found(vec![
            expression("e1", "ok", Some(1.0)),
            expression("e2", "ok", Some(2.0)),
            expression("e3", "ok", Some(3.0)),
        ]),
    );
    renderer.render_expressions(&mut view, &Listing::Found(vec![expression("e4", "running", None)]));

    assert_eq!(view.rows(), &[cells(&["e4", "running", ""])]);
}

#[test]
fn missing_task_fields_render_as_empty_cells() {
    let bare = Task {
        id: TaskId::new("t0"),
        arg1: None,
        arg2: None,
        operation: None,
        operation_time: None,
        is_busy: false,
    };
    let mut view = TableView::tasks();
    CollectionRenderer::default().render_tasks(&mut view, &[bare]);
    assert_eq!(view.rows(), &[cells(&["t0", "", "", "", "", "No"])]);
}

#[test]
fn table_text_aligns_columns_and_spans_placeholder() {
    let mut view = TableView::expressions();
    view.replace_rows(vec![cells(&["expr-1", "ok", "4"])]);
    assert_eq!(
        view.to_text(),
        "Id     | Status | Result\n------------------------\nexpr-1 | ok     | 4\n"
    );

    CollectionRenderer::default().render_expressions(&mut view, &Listing::NotFound);
    assert!(view.to_text().ends_with("\nNo expressions\n"));
}

#[test]
fn expression_detail_reproduces_values_verbatim() {
    let mut panel = DetailPanel::default();
    panel.show_expression(&expression("e1", "done", Some(4.0)));

    assert_eq!(panel.value("Id"), Some("e1"));
    assert_eq!(panel.value("Status"), Some("done"));
    assert_eq!(panel.value("Result"), Some("4"));
    assert_eq!(panel.to_text(), "Id: e1\nStatus: done\nResult: 4\n");
}

#[test]
fn task_detail_replaces_previous_content() {
    let mut panel = DetailPanel::default();
    panel.show_expression(&expression("e1", "done", Some(4.0)));
    panel.show_task(&TaskDetail {
        id: TaskId::new("t7"),
        arg1: Some(Scalar::from(1.0)),
        arg2: Some(Scalar::from(2.0)),
        operation: Some(Scalar::from("+")),
        operation_time: Some(Scalar::from(50.0)),
    });

    let labels: Vec<&str> = panel.fields().iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, ["Id", "Arg1", "Arg2", "Operation", "OperationTime"]);
    assert_eq!(panel.value("Status"), None);
}

#[test]
fn message_surface_keeps_only_latest_message() {
    let mut surface = MessageSurface::default();
    assert_eq!(surface.text(), None);

    surface.show("first");
    let first_at = surface.current().expect("shown").shown_at;
    surface.show("second");

    assert_eq!(surface.text(), Some("second"));
    assert!(surface.current().expect("shown").shown_at >= first_at);
}

#[test]
fn locale_parses_short_and_long_names() {
    assert_eq!("ru".parse::<Locale>(), Ok(Locale::Russian));
    assert_eq!(" English ".parse::<Locale>(), Ok(Locale::English));
    assert!("de".parse::<Locale>().is_err());
}
