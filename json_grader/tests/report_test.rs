use json_grader::{
    JsonTestRunner, LeaderboardOrder, RunReport, TestCase, TestSuite, Visibility, ensure, ensure_eq,
};
use serde_json::json;

fn fibonacci(n: u64) -> u64 {
    (0..n).fold((0, 1), |(a, b), _| (b, a + b)).0
}

fn assignment() -> TestSuite {
    TestSuite::new("assignment")
        .with_suite(
            TestSuite::new("basics")
                .with_test(
                    TestCase::new("test_first_terms", |_| {
                        ensure_eq(
                            (0..6).map(fibonacci).collect::<Vec<_>>(),
                            vec![0, 1, 1, 2, 3, 5],
                        )
                    })
                    .description("First terms of the sequence")
                    .weight(2.0)
                    .tags(["sequences"]),
                )
                .with_test(
                    TestCase::new("test_large_term", |ctx| {
                        writeln!(ctx.stdout(), "computing fib(50)")?;
                        ensure(fibonacci(50) == 1, "fib(50) is not 1")
                    })
                    .weight(3.0)
                    .visibility(Visibility::AfterDueDate),
                ),
        )
        .with_test(
            TestCase::new("test_speed", |ctx| {
                ctx.set_value(fibonacci(20));
                Ok(())
            })
            .leaderboard_column("speed")
            .leaderboard_order(LeaderboardOrder::Desc),
        )
}

#[test_log::test]
fn should_grade_a_whole_assignment() {
    let mut runner = JsonTestRunner::new(vec![]).with_visibility(Visibility::AfterPublished);
    let result = runner.run(&assignment()).unwrap();
    assert_eq!(result.tests_run(), 3);
    assert!(!result.was_successful());

    let out = runner.into_inner();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        value["tests"],
        json!([
            {
                "name": "First terms of the sequence",
                "score": 2.0,
                "max_score": 2.0,
                "tags": ["sequences"]
            },
            {
                "name": "test_large_term",
                "score": 0.0,
                "max_score": 3.0,
                "output": "computing fib(50)\nTest Failed: AssertionError: fib(50) is not 1\n",
                "visibility": "after_due_date"
            }
        ])
    );
    assert_eq!(
        value["leaderboard"],
        json!([{"name": "speed", "value": 6765, "order": "desc"}])
    );
    assert_eq!(value["score"], json!(2.0));
    assert_eq!(value["visibility"], json!("after_published"));

    let report: RunReport = serde_json::from_slice(&out).unwrap();
    assert_eq!(report.max_score(), 5.0);
    assert_eq!(report.execution_time.split('.').nth(1).map(str::len), Some(2));
}

#[test_log::test]
fn should_indent_with_four_spaces() {
    let mut runner = JsonTestRunner::new(vec![]);
    runner.run(&TestSuite::new("empty")).unwrap();
    let text = String::from_utf8(runner.into_inner()).unwrap();
    assert!(text.starts_with("{\n    \"tests\": [],\n"));
    assert!(text.contains("\n    \"score\": 0.0,\n"));
    assert!(text.ends_with("\"visibility\": \"visible\"\n}\n"));
}

#[test_log::test]
fn should_write_unsigned_zero_score_for_leaderboard_only_suite() {
    let suite = TestSuite::new("leaderboard").with_test(
        TestCase::new("test_speed", |ctx| {
            ctx.set_value(fibonacci(10));
            Ok(())
        })
        .leaderboard_column("speed"),
    );
    let mut runner = JsonTestRunner::new(vec![]);
    runner.run(&suite).unwrap();
    let text = String::from_utf8(runner.into_inner()).unwrap();
    assert!(text.contains("\n    \"score\": 0.0,\n"));
    assert!(!text.contains("-0.0"));
}
