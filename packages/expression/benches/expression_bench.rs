use criterion::{black_box, criterion_group, criterion_main, Criterion};
use formwork_expression::{
    parse, AssignmentExpression, ComputedVariable, ExpressionEvaluator, Interpreter, Model, Scope,
};
use serde_json::json;

const DAY_COUNT: &str = "model.startDate && model.endDate ? Math.ceil((new Date(model.endDate) - new Date(model.startDate)) / (1000 * 60 * 60 * 24)) + 1 : 1";

fn leave_model() -> Model {
    json!({
        "employeeName": "Ada",
        "leaveType": "annual",
        "days": 1,
        "startDate": "2024-01-01",
        "endDate": "2024-01-05",
        "reason": "Family trip"
    })
    .as_object()
    .cloned()
    .unwrap()
}

fn parse_day_count(c: &mut Criterion) {
    c.bench_function("parse_day_count", |b| b.iter(|| parse(black_box(DAY_COUNT))));
}

fn evaluate_parsed_day_count(c: &mut Criterion) {
    let expr = parse(DAY_COUNT).unwrap();
    let scope = Scope::new().with("model", serde_json::Value::Object(leave_model()));

    c.bench_function("evaluate_parsed_day_count", |b| {
        b.iter(|| Interpreter::new(&scope).evaluate(black_box(&expr)))
    });
}

fn evaluate_form_pass(c: &mut Criterion) {
    let model = leave_model();
    let variables = vec![
        ComputedVariable::new("calculatedDays", DAY_COUNT),
        ComputedVariable::new("isLong", "model.days > 5"),
    ];
    let assignments = vec![AssignmentExpression::new("days", "computed.calculatedDays")];

    c.bench_function("evaluate_form_pass", |b| {
        b.iter(|| {
            let computed =
                ExpressionEvaluator::evaluate_computed_variables(black_box(&model), &variables);
            ExpressionEvaluator::evaluate_assignments(&model, &computed, &assignments)
        })
    });
}

criterion_group!(
    benches,
    parse_day_count,
    evaluate_parsed_day_count,
    evaluate_form_pass
);
criterion_main!(benches);
