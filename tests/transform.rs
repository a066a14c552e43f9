use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use attributify::{transform, Attributify, BoxError, Enforce, Error, Options, UtilityEngine, UtilitySet};

fn uno() -> UtilitySet {
    [
        "mt-2", "p-1", "flex", "hover", "text-red", "text-bold", "bg-blue", "border", "w-1/2",
    ]
    .into_iter()
    .collect()
}

async fn run(src: &str) -> String {
    transform(src, &uno(), &Options::default()).await.unwrap()
}

async fn run_with(src: &str, options: Options) -> String {
    transform(src, &uno(), &options).await.unwrap()
}

fn deleting() -> Options {
    Options {
        delete_class: true,
        ..Options::default()
    }
}

#[tokio::test]
async fn no_elements_is_identity() {
    let src = "plain text, a < b and c > d, </div> <br>";
    assert_eq!(run(src).await, src);
}

#[tokio::test]
async fn unresolved_elements_are_untouched() {
    let src = "<div foo bar=\"baz qux\">\n  <span title='x'>hi</span>\n</div>";
    assert_eq!(run(src).await, src);
}

#[tokio::test]
async fn non_valued_attribute_adds_class() {
    assert_eq!(
        run("<div mt-2>x</div>").await,
        r#"<div mt-2 class="mt-2">x</div>"#
    );
}

#[tokio::test]
async fn non_valued_attribute_deleted_with_delete_class() {
    assert_eq!(
        run_with("<div mt-2>x</div>", deleting()).await,
        r#"<div class="mt-2">x</div>"#
    );
}

#[tokio::test]
async fn valued_attribute_appends_to_existing_class() {
    assert_eq!(
        run(r#"<div class="a" text="red">"#).await,
        r#"<div class="a text-red" text="red">"#
    );
}

#[tokio::test]
async fn existing_class_after_utilities() {
    assert_eq!(
        run_with(r#"<p text="red bold" class="lead">"#, deleting()).await,
        r#"<p class="lead text-red text-bold">"#
    );
}

#[tokio::test]
async fn class_name_alias() {
    assert_eq!(
        run(r#"<Box className="card" flex />"#).await,
        r#"<Box className="card flex" flex />"#
    );
}

#[tokio::test]
async fn bound_class_is_not_an_existing_class() {
    assert_eq!(
        run(r#"<div :class="{ on }" p-1>"#).await,
        r#"<div :class="{ on }" p-1 class="p-1">"#
    );
}

#[tokio::test]
async fn rejected_tokens_leave_attribute_in_place() {
    assert_eq!(
        run_with(r#"<div text="green" mt-3 p-1>"#, deleting()).await,
        r#"<div text="green" mt-3 class="p-1">"#
    );
}

#[tokio::test]
async fn partial_confirmation_still_deletes_attribute() {
    assert_eq!(
        run_with(r#"<div text="green red">"#, deleting()).await,
        r#"<div class="text-red">"#
    );
}

#[tokio::test]
async fn tilde_fragment() {
    assert_eq!(
        run(r#"<a hover="~">"#).await,
        r#"<a hover="~" class="hover">"#
    );
}

#[tokio::test]
async fn ignored_attributes() {
    let src = r#"<input placeholder="red" lang="mt-2">"#;
    let engine: UtilitySet = ["placeholder-red", "lang-mt-2"].into_iter().collect();
    assert_eq!(transform(src, &engine, &Options::default()).await.unwrap(), src);
}

#[tokio::test]
async fn non_valued_disabled() {
    let options = Options {
        non_valued_attribute: false,
        ..Options::default()
    };
    let src = "<div mt-2>";
    assert_eq!(run_with(src, options).await, src);
}

#[tokio::test]
async fn prefixed_only_strips_prefix() {
    let options = Options {
        prefixed_only: true,
        delete_class: true,
        ..Options::default()
    };
    assert_eq!(
        run_with(r#"<div un-text="red" un-flex>"#, options).await,
        r#"<div class="text-red flex">"#
    );
}

#[tokio::test]
async fn prefix_removed_behind_binding_decoration() {
    let options = Options {
        prefixed_only: true,
        ..Options::default()
    };
    assert_eq!(
        run_with(r#"<div :un-text="red">"#, options.clone()).await,
        r#"<div :un-text="red" class="text-red">"#
    );
    assert_eq!(
        run_with(r#"<div v-bind:un-bg="blue">"#, options).await,
        r#"<div v-bind:un-bg="blue" class="bg-blue">"#
    );
}

#[tokio::test]
async fn binding_decorations() {
    assert_eq!(
        run(r#"<div v-bind:bg="blue" :border="~">"#).await,
        r#"<div v-bind:bg="blue" :border="~" class="bg-blue border">"#
    );
    assert_eq!(
        run(r#"<div bg={"blue"}>"#).await,
        r#"<div bg={"blue"} class="bg-blue">"#
    );
}

#[tokio::test]
async fn quoted_greater_than_inside_value() {
    assert_eq!(
        run(r#"<div title="a > b" mt-2>"#).await,
        r#"<div title="a > b" mt-2 class="mt-2">"#
    );
}

#[tokio::test]
async fn jsx_handler_with_arrow() {
    assert_eq!(
        run_with(r#"<button onClick={() => n > 1} p-1>go</button>"#, deleting()).await,
        r#"<button onClick={() => n > 1} class="p-1">go</button>"#
    );
}

#[tokio::test]
async fn deletion_does_not_hit_longer_names() {
    assert_eq!(
        run_with("<div mt-2-x mt-2>", deleting()).await,
        r#"<div mt-2-x class="mt-2">"#
    );
}

#[tokio::test]
async fn slash_in_utility_and_self_closing() {
    assert_eq!(
        run("<img w-1/2/>").await,
        r#"<img w-1/2 class="w-1/2"/>"#
    );
}

#[tokio::test]
async fn duplicates_are_not_merged() {
    assert_eq!(
        run(r#"<div mt-2 flex="~" mt-2>"#).await,
        r#"<div mt-2 flex="~" mt-2 class="mt-2 flex mt-2">"#
    );
}

#[tokio::test]
async fn multiple_elements_and_surroundings_preserved() {
    let src = "<!doctype html>\n<main p-1>\n  <p>text</p>\n  <i text=\"bold\" data-x='1'></i>\n</main>\n";
    let want = "<!doctype html>\n<main p-1 class=\"p-1\">\n  <p>text</p>\n  <i text=\"bold\" data-x='1' class=\"text-bold\"></i>\n</main>\n";
    assert_eq!(run(src).await, want);
}

#[tokio::test]
async fn non_ascii_text_is_preserved() {
    assert_eq!(
        run("日本語 <p mt-2>ü</p> ✓").await,
        "日本語 <p mt-2 class=\"mt-2\">ü</p> ✓"
    );
}

/// Earlier calls sleep longer, so concurrent lookups complete in reverse
/// issue order.
struct SlowEngine {
    known: UtilitySet,
    calls: AtomicUsize,
}

#[async_trait]
impl UtilityEngine for SlowEngine {
    async fn parse_token(&self, token: &str) -> Result<bool, BoxError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
        tokio::time::sleep(Duration::from_millis(40u64.saturating_sub(n * 10))).await;
        Ok(self.known.contains(token))
    }
}

#[tokio::test]
async fn fragment_order_not_completion_order() {
    let engine = SlowEngine {
        known: ["text-a", "text-b", "text-c", "mt-2"].into_iter().collect(),
        calls: AtomicUsize::new(0),
    };
    let out = transform(r#"<p text="a x b c" mt-2>"#, &engine, &Options::default())
        .await
        .unwrap();
    assert_eq!(out, r#"<p text="a x b c" mt-2 class="text-a text-b text-c mt-2">"#);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 5);
}

/// Tracks how many lookups are pending at once.
#[derive(Default)]
struct InFlightEngine {
    current: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl UtilityEngine for InFlightEngine {
    async fn parse_token(&self, _token: &str) -> Result<bool, BoxError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(false)
    }
}

#[tokio::test]
async fn fragments_of_one_attribute_are_looked_up_together() {
    let engine = InFlightEngine::default();
    transform(r#"<p text="a b c">"#, &engine, &Options::default())
        .await
        .unwrap();
    assert_eq!(engine.peak.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn attributes_are_looked_up_one_after_another() {
    let engine = InFlightEngine::default();
    transform(r#"<p mt-2 text="a b" bg="c">"#, &engine, &Options::default())
        .await
        .unwrap();
    assert_eq!(engine.peak.load(Ordering::SeqCst), 2);
    assert_eq!(engine.current.load(Ordering::SeqCst), 0);
}

struct FailingEngine;

#[async_trait]
impl UtilityEngine for FailingEngine {
    async fn parse_token(&self, token: &str) -> Result<bool, BoxError> {
        if token == "text-boom" {
            return Err("engine crashed".into());
        }
        Ok(true)
    }
}

#[tokio::test]
async fn engine_failure_aborts_transform() {
    let err = transform(
        r#"<a mt-2></a><b text="ok boom">"#,
        &FailingEngine,
        &Options::default(),
    )
    .await
    .unwrap_err();
    match err {
        Error::Engine { token, source } => {
            assert_eq!(token, "text-boom");
            assert_eq!(source.to_string(), "engine crashed");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Rejects every selector, so bare attributes never reach `parse_token`.
struct NoSelectors;

#[async_trait]
impl UtilityEngine for NoSelectors {
    async fn parse_token(&self, _token: &str) -> Result<bool, BoxError> {
        Ok(true)
    }

    fn is_valid_selector(&self, _selector: &str) -> bool {
        false
    }
}

#[tokio::test]
async fn selector_predicate_gates_non_valued_only() {
    assert_eq!(
        transform(r#"<div mt-2 text="red">"#, &NoSelectors, &Options::default())
            .await
            .unwrap(),
        r#"<div mt-2 text="red" class="text-red">"#
    );
}

#[tokio::test]
async fn transformer_handle() {
    let t = Attributify::new(deleting());
    assert_eq!(t.name(), "transformer-attributify");
    assert_eq!(t.enforce(), Enforce::Pre);
    assert!(t.options().delete_class);
    assert_eq!(
        t.transform("<div flex>", &uno()).await.unwrap(),
        r#"<div class="flex">"#
    );
}
