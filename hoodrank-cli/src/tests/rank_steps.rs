//! Behaviour-driven step definitions driving the rank CLI scenarios.

use super::helpers::{sample_request, workspace, write_request, write_utf8};
use super::*;
use camino::Utf8PathBuf;
use hoodrank_scorer::RankError;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

#[derive(Debug)]
struct RankWorld {
    _tmp: TempDir,
    request_path: Utf8PathBuf,
    include_request: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl RankWorld {
    fn new() -> Self {
        let (tmp, root) = workspace();
        Self {
            _tmp: tmp,
            request_path: root.join("request.json"),
            include_request: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["hoodrank".to_owned(), "rank".to_owned()];
        if *self.include_request.borrow() {
            argv.push(self.request_path.as_str().to_owned());
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn output(&self) -> serde_json::Value {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        result.as_ref().expect("expected success");
        serde_json::from_slice(&self.stdout.borrow()).expect("output should be JSON")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> RankWorld {
    RankWorld::new()
}

#[given("a valid rank request exists on disk")]
fn valid_rank_request_exists(#[from(world)] world: &RankWorld) {
    write_request(&world.request_path, &sample_request());
}

#[given("I pass {flags}")]
fn pass_flags(#[from(world)] world: &RankWorld, flags: String) {
    world
        .cli_args
        .borrow_mut()
        .extend(flags.trim_matches('"').split_whitespace().map(str::to_owned));
}

#[given("the rank request contains invalid JSON")]
fn rank_request_contains_invalid_json(#[from(world)] world: &RankWorld) {
    write_utf8(&world.request_path, b"{ not valid json");
}

#[given("the rank request repeats an area name")]
fn rank_request_repeats_area(#[from(world)] world: &RankWorld) {
    let mut request = sample_request();
    let first = request.areas.first().cloned().expect("sample areas");
    request.areas.push(first);
    write_request(&world.request_path, &request);
}

#[given("I omit the rank request path")]
fn omit_rank_request_path(#[from(world)] world: &RankWorld) {
    *world.include_request.borrow_mut() = false;
}

#[when("I run the rank command")]
fn run_rank_command(#[from(world)] world: &RankWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Rank(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_rank_with(args, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints a shortlist")]
fn command_succeeds_and_prints_shortlist(#[from(world)] world: &RankWorld) {
    let output = world.output();
    let ranks: Vec<u64> = output["ranking"]["areas"]
        .as_array()
        .expect("ranked areas")
        .iter()
        .filter_map(|entry| entry["rank"].as_u64())
        .collect();
    assert_eq!(ranks, [1, 2, 3]);
    let shortlisted = output["sub_areas"].as_array().expect("sub-area picks");
    assert_eq!(shortlisted.len(), 3);
}

#[then("the shortlist reports diversity disabled")]
fn shortlist_reports_diversity_disabled(#[from(world)] world: &RankWorld) {
    let output = world.output();
    let picks = output["sub_areas"].as_array().expect("sub-area picks");
    assert!(!picks.is_empty());
    for pick in picks {
        assert_eq!(pick["selection"]["debug"]["diversity"], false);
    }
}

#[then("the command fails because the request JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &RankWorld) {
    match &*world.error() {
        CliError::ParseRankRequest { .. } => {}
        other => panic!("expected ParseRankRequest, found {other:?}"),
    }
}

#[then("the command fails because the request is invalid")]
fn command_fails_invalid_request(#[from(world)] world: &RankWorld) {
    match &*world.error() {
        CliError::Rank(RankError::Record(_)) => {}
        other => panic!("expected a record error, found {other:?}"),
    }
}

#[then("the command fails because the request path is missing")]
fn command_fails_missing_request_path(#[from(world)] world: &RankWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_RANK_REQUEST),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_rank_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/rank_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: RankWorld) {
            let _ = world;
        }
    };
}

register_rank_scenario!(rank_happy_path, "ranking a request from JSON");
register_rank_scenario!(rank_without_diversity, "disabling diversity from the command line");
register_rank_scenario!(rank_invalid_json, "rejecting invalid JSON input");
register_rank_scenario!(rank_duplicate_areas, "rejecting duplicate area names");
register_rank_scenario!(rank_missing_request, "rejecting missing request paths");
