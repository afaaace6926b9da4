use mathgrade_compute::symbolic::Budget;
use mathgrade_engine::{
    grade,
    is_equal,
    ComparisonConfig,
    ProblemKind,
    ProblemSpec,
    Submission,
};
use mathgrade_parser::normalize::normalize;
use pretty_assertions::assert_eq;

const SAMPLES: &[&str] = &[
    "2x+1",
    r"\frac{x^2-1}{x-1}",
    r"\sqrt{8}",
    r"e^{i\pi}",
    r"\sin^2 x + \cos^2 x",
    r"\log_2 8",
    "y = 3x - 2",
    r"x \le 5",
    "3.14",
    r"\left(x_12\right)",
];

fn equal(a: &str, b: &str, config: &ComparisonConfig) -> bool {
    let a = ProblemKind::Math.parse(a).unwrap();
    let b = ProblemKind::Math.parse(b).unwrap();
    is_equal(&a, &b, config, &mut Budget::new(config.budget)).unwrap()
}

#[test]
fn normalizer_is_idempotent() {
    for sample in SAMPLES {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once);
    }
}

#[test]
fn reflexive() {
    let configs = [
        ComparisonConfig::default(),
        ComparisonConfig { tolerance: Some(0.1), ..ComparisonConfig::default() },
        ComparisonConfig { use_trigonometric: true, use_log: true, ..ComparisonConfig::default() },
    ];
    for config in &configs {
        for sample in SAMPLES {
            assert!(equal(sample, sample, config), "{} under {:?}", sample, config);
        }
    }
}

#[test]
fn symmetric() {
    let config = ComparisonConfig::default();
    for a in SAMPLES {
        for b in SAMPLES {
            assert_eq!(equal(a, b, &config), equal(b, a, &config), "{} vs {}", a, b);
        }
    }
}

#[test]
fn tolerance_is_monotonic() {
    let pairs = [("3.14", "3.1405"), (r"\pi", "3.14"), ("1", "1.25"), (r"\sqrt{2}", "1.41")];
    let tolerances = [0.0001, 0.001, 0.01, 0.1, 0.5, 1.0];
    for (a, b) in pairs {
        let mut accepted = false;
        for tolerance in tolerances {
            let config = ComparisonConfig { tolerance: Some(tolerance), ..ComparisonConfig::default() };
            let equal = equal(a, b, &config);
            assert!(equal || !accepted, "{} vs {} rejected at {} after being accepted", a, b, tolerance);
            accepted |= equal;
        }
    }
}

#[test]
fn count_mismatch_regardless_of_content() {
    let spec = ProblemSpec::from_json(r#"{ "answers": { "0": "x", "1": "y" } }"#).unwrap();
    for answers in [vec!["x"], vec!["x", "y", "z"], vec!["1", "2", "3", "4"]] {
        let result = grade(&spec, &Submission::new(answers));
        assert_eq!(result.valid, Some(false));
        assert_eq!(result.feedback, vec!["Expected 2 answer(s)"]);
    }
}

#[test]
fn distractor_precedence() {
    let spec = ProblemSpec::from_json(r#"{
        "answer": "\\frac{1}{2}",
        "choices": {
            "0": { "answer": "0.5", "feedback": "Give an exact fraction." },
            "1": { "answer": "2", "feedback": "Upside down." }
        }
    }"#).unwrap();

    let result = grade(&spec, &Submission::new(["0.5"]));
    assert_eq!(result.valid, Some(false));
    assert_eq!(result.feedback, vec!["Give an exact fraction."]);

    let result = grade(&spec, &Submission::new(["2"]));
    assert_eq!(result.feedback, vec!["Upside down."]);
}
