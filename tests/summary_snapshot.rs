//! Library-level run over the shared fixture, summarized as a snapshot.

use tsfix::core::{Classifier, ExtractionMode, Fixer, Outcome, Summary};
use tsfix::infra::{FileWalker, TsConfig, package_dependencies};

mod util;
use util::{INDEX_BEFORE, make_project};

#[test]
fn dry_run_summary_over_fixture()
{
    let tmp = make_project();

    let ts = TsConfig::load(&tmp.path().join("tsconfig.json")).expect("tsconfig");
    let out_dir = ts.out_dir().expect("outDir");

    let files = FileWalker::new(&["**/node_modules/**".to_string()])
        .expect("walker")
        .with_include("*.{js,ts}")
        .expect("include glob")
        .walk_files(out_dir);

    let fixer = Fixer::new(ExtractionMode::Pattern, Classifier::new(package_dependencies(tmp.path())))
        .with_aliases(ts.path_aliases())
        .dry_run(true);

    let results: Vec<_> = files
        .iter()
        .map(|f| fixer.process_file(f))
        .collect();

    insta::assert_yaml_snapshot!(Summary::tally(&results), @r"
    files_scanned: 6
    files_changed: 2
    files_failed: 0
    rewritten: 5
    missing: 1
    unresolved_aliases: 1
    ");

    // Dry run never touches the tree
    assert_eq!(
        std::fs::read_to_string(out_dir.join("index.js")).expect("read index.js"),
        INDEX_BEFORE
    );
}

#[test]
fn home_outcomes_in_extraction_order()
{
    let tmp = make_project();
    let ts = TsConfig::load(&tmp.path().join("tsconfig.json")).expect("tsconfig");

    let report = Fixer::new(ExtractionMode::Structural, Classifier::new(package_dependencies(tmp.path())))
        .with_aliases(ts.path_aliases())
        .dry_run(true)
        .process_file(&tmp.path().join("dist/pages/home.js"))
        .expect("process home.js");

    assert_eq!(
        report.outcomes,
        vec![
            Outcome::UnresolvedAlias { specifier: "lodash".into() },
            Outcome::Rewritten { from: "@/lib/helper".into(), to: "../lib/helper.js".into() },
        ]
    );
}
