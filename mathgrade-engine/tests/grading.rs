use mathgrade_engine::{grade, ProblemSpec, Submission};
use pretty_assertions::assert_eq;

fn spec(json: &str) -> ProblemSpec {
    ProblemSpec::from_json(json).unwrap()
}

fn valid(spec: &ProblemSpec, answers: &[&str]) -> Option<bool> {
    grade(spec, &Submission::new(answers.iter().copied())).valid
}

#[test]
fn same_polynomial() {
    let spec = spec(r#"{ "answer": "2x+1" }"#);
    assert_eq!(valid(&spec, &["x+x+1"]), Some(true));
    assert_eq!(valid(&spec, &["2x"]), Some(false));
}

#[test]
fn answer_order_is_irrelevant() {
    let spec = spec(r#"{ "answers": { "0": "x", "1": "y" } }"#);
    assert_eq!(valid(&spec, &["y", "x"]), Some(true));
    assert_eq!(valid(&spec, &["x", "y"]), Some(true));
    assert_eq!(valid(&spec, &["x", "x"]), Some(false));
}

#[test]
fn numeric_tolerance() {
    let spec = spec(r#"{ "answer": "3.14", "tolerance": "0.01" }"#);
    assert_eq!(valid(&spec, &["3.1405"]), Some(true));
    assert_eq!(valid(&spec, &["3.20"]), Some(false));
}

#[test]
fn interval_union_order() {
    let spec = spec(r#"{ "type": "math_interval", "answer": "[0,2]\\cup[5,\\infty)" }"#);
    assert_eq!(valid(&spec, &[r"[5,\infty)\cup[0,2]"]), Some(true));
    assert_eq!(valid(&spec, &[r"\left[0,2\right]\cup\left[5,\infty\right)"]), Some(true));
    assert_eq!(valid(&spec, &[r"[0,2)\cup[5,\infty)"]), Some(false));
}

#[test]
fn interval_with_parameter() {
    let spec = spec(r#"{ "type": "math_interval", "answer": "[0,2k)" }"#);
    assert_eq!(valid(&spec, &["[0,k+k)"]), Some(true));
    assert_eq!(valid(&spec, &["[0,2k]"]), Some(false));
    assert_eq!(valid(&spec, &["[0,2)"]), Some(false));
}

#[test]
fn matrix_shape_mismatch() {
    let spec = spec(r#"{ "type": "math_matrix", "answer": "[1,2:3,4]" }"#);
    let result = grade(&spec, &Submission::new(["[1,2,3,4]"]));
    assert_eq!(result.valid, Some(false));
    assert_eq!(result.feedback, vec!["Expected 1 answer(s) of size [(2, 2)]"]);

    assert_eq!(valid(&spec, &[r"\begin{pmatrix}1 & 2 \\ 3 & 4\end{pmatrix}"]), Some(true));
}

#[test]
fn explicit_and_implicit_sets() {
    let spec = spec(r#"{ "type": "math_set", "answer": "\\{1,2,3\\}" }"#);
    assert_eq!(valid(&spec, &[r"\left\{3,2,1\right\}"]), Some(true));
    assert_eq!(valid(&spec, &[r"\{x | x < 4 | N\}"]), Some(true));
    assert_eq!(valid(&spec, &[r"\{1,2\}\cup\{3\}"]), Some(true));
    assert_eq!(valid(&spec, &[r"\{0,1,2,3\}"]), Some(false));
}

#[test]
fn set_parse_error_shows_format() {
    let spec = spec(r#"{ "type": "math_set", "answer": "\\{1\\}", "set_type": "implicit" }"#);
    let result = grade(&spec, &Submission::new([r"\{x | x > 1\}"]));
    assert_eq!(result.valid, Some(false));
    assert_eq!(result.weight, 1);
    assert!(result.feedback[1].contains("Implicit: {x|x<4|N}"));
}

#[test]
fn equations() {
    let spec = spec(r#"{ "answer": "y = 2x + 1" }"#);
    assert_eq!(valid(&spec, &["2y = 4x + 2"]), Some(true));
    assert_eq!(valid(&spec, &["2x + 1"]), Some(false));
}

#[test]
fn reference_parse_error_is_reported() {
    let spec = spec(r#"{ "answer": "\\frac{1}{" }"#);
    let result = grade(&spec, &Submission::new(["1"]));
    assert_eq!(result.valid, Some(false));
    assert_eq!(result.weight, 1);
}

#[test]
fn snapshot_is_sorted_latex() {
    let spec = spec(r#"{ "answers": { "0": "a", "1": "b" } }"#);
    let result = grade(&spec, &Submission::new(["b", "a"]));
    let state: Vec<String> = serde_json::from_str(&result.state).unwrap();
    assert_eq!(state, vec!["a", "b"]);
}

#[test]
fn snapshot_is_kept_on_wrong_answer() {
    let spec = spec(r#"{ "answer": "a" }"#);
    let submission = Submission {
        answers: vec!["b".to_string()],
        prior_state: "old".to_string(),
    };
    let result = grade(&spec, &submission);
    assert_eq!(result.valid, Some(false));
    assert_eq!(result.state, r#"["b"]"#);
}

#[test]
fn wire_round_trip() {
    let spec = spec(r#"{ "answer": "x" }"#);
    let submission = Submission::from_json(r#"{ "q": ["x"], "@state": "{\"q\": \"old\"}" }"#, "q").unwrap();
    let result = grade(&spec, &submission);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["valid"], serde_json::Value::Bool(true));
    assert_eq!(json["multiplier"], serde_json::Value::Null);
}
