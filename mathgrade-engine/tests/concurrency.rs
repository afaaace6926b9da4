use mathgrade_engine::{grade, ProblemSpec, Submission};
use std::{sync::Arc, thread};

#[test]
fn shared_spec_across_threads() {
    let spec = Arc::new(ProblemSpec::from_json(r#"{
        "answers": { "0": "(x+1)^2", "1": "y" },
        "choices": { "0": { "answer": "x^2+1", "feedback": "Expand carefully." } }
    }"#).unwrap());

    let cases: [(&[&str], Option<bool>); 4] = [
        (&["y", "x^2+2x+1"], Some(true)),
        (&["x^2+1", "y"], Some(false)),
        (&["y"], Some(false)),
        (&["(x+1)(x+1)", "y"], Some(true)),
    ];

    let handles = (0..8)
        .map(|worker| {
            let spec = Arc::clone(&spec);
            thread::spawn(move || {
                (0..10)
                    .map(|round| {
                        let (answers, expected) = cases[(worker + round) % cases.len()];
                        let result = grade(&spec, &Submission::new(answers.iter().copied()));
                        (answers, result.valid, expected)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        for (answers, valid, expected) in handle.join().unwrap() {
            assert_eq!(valid, expected, "answers: {:?}", answers);
        }
    }
}
