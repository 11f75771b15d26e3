use crate::{
    collector, runner, sumfile, test::get_stress_iterations_count, test::usecase::UseCase,
    walker, Algorithm, Options, Tolerance, E,
};
use std::{fs, time::Instant};

fn options(threads: usize) -> Options {
    let mut opt = Options::new();
    opt.threads(threads).verbose(true);
    opt
}

#[test]
fn hello_world() -> Result<(), E> {
    let usecase = UseCase::empty()?;
    usecase.write("sub/b.txt", b"world")?;
    usecase.write("a.txt", b"hello")?;
    let opt = options(2);
    let summary = runner::hash(&usecase.root, &[Algorithm::Md5], &opt)?;
    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].files, 2);
    assert_eq!(summary.reports[0].sum_file, usecase.root.join("md5sum.txt"));
    assert_eq!(
        fs::read_to_string(usecase.root.join("md5sum.txt"))?,
        "5d41402abc4b2a76b9719d911017c592 a.txt\n7d793037a0760186574b0282f2f435e7 sub/b.txt\n"
    );
    let summary = runner::verify(&usecase.root, &[Algorithm::Md5], &opt)?;
    assert_eq!(summary.reports[0].total, 2);
    assert_eq!(summary.reports[0].matched(), 2);
    assert_eq!(summary.mismatched(), 0);
    usecase.write("a.txt", b"hello!")?;
    let summary = runner::verify(&usecase.root, &[Algorithm::Md5], &opt)?;
    assert_eq!(summary.reports[0].total, 2);
    assert_eq!(summary.reports[0].mismatched, vec!["a.txt".to_owned()]);
    usecase.clean()?;
    Ok(())
}

#[test]
fn round_trip_all_algorithms() -> Result<(), E> {
    let usecase = UseCase::unnamed(3, 3, 2, &["aaa", "bbb"])?;
    let opt = options(4);
    let summary = runner::hash(&usecase.root, &Algorithm::ALL, &opt)?;
    assert_eq!(summary.failed(), 0);
    for (report, algorithm) in summary.reports.iter().zip(Algorithm::ALL) {
        assert_eq!(report.algorithm, algorithm);
        assert_eq!(report.files, usecase.files.len());
        assert!(report.sum_file.exists());
    }
    let summary = runner::verify(&usecase.root, &Algorithm::ALL, &opt)?;
    assert_eq!(summary.mismatched(), 0);
    for report in summary.reports.iter() {
        assert_eq!(report.total, usecase.files.len());
    }
    let changed = usecase.change(5)?;
    let summary = runner::verify(&usecase.root, &Algorithm::ALL, &opt)?;
    for report in summary.reports.iter() {
        assert_eq!(report.mismatched.len(), changed.len(), "{}", report.algorithm);
        assert_eq!(report.matched(), usecase.files.len() - changed.len());
    }
    usecase.clean()?;
    Ok(())
}

#[test]
fn sum_files_are_not_recorded() -> Result<(), E> {
    let usecase = UseCase::empty()?;
    usecase.write("a.txt", b"hello")?;
    usecase.write("nested/md5sum.txt", b"not ours")?;
    let opt = options(2);
    runner::hash(&usecase.root, &[Algorithm::Md5, Algorithm::Sha1], &opt)?;
    let summary = runner::hash(&usecase.root, &[Algorithm::Md5, Algorithm::Sha1], &opt)?;
    for report in summary.reports.iter() {
        assert_eq!(report.files, 2);
    }
    let records = sumfile::read(&usecase.root.join("md5sum.txt"))?;
    assert_eq!(
        records.iter().map(|r| r.path.as_str()).collect::<Vec<&str>>(),
        vec!["a.txt", "nested/md5sum.txt"]
    );
    let summary = runner::verify(&usecase.root, &[Algorithm::Md5, Algorithm::Sha1], &opt)?;
    assert_eq!(summary.mismatched(), 0);
    usecase.clean()?;
    Ok(())
}

#[test]
fn same_result_for_any_parallelism() -> Result<(), E> {
    let usecase = UseCase::unnamed(4, 3, 1, &[])?;
    runner::hash(&usecase.root, &[Algorithm::Sha256], &options(1))?;
    let expected = fs::read_to_string(usecase.root.join("sha256sum.txt"))?;
    for _ in 0..get_stress_iterations_count() {
        for threads in [2, 3, 8] {
            runner::hash(&usecase.root, &[Algorithm::Sha256], &options(threads))?;
            assert_eq!(
                fs::read_to_string(usecase.root.join("sha256sum.txt"))?,
                expected
            );
        }
    }
    usecase.clean()?;
    Ok(())
}

#[test]
fn missing_sum_file() -> Result<(), E> {
    let usecase = UseCase::empty()?;
    assert!(matches!(
        runner::verify(&usecase.root, &[Algorithm::Md5], &options(2)),
        Err(E::SumFile(sumfile::E::IO(..)))
    ));
    usecase.clean()?;
    Ok(())
}

#[test]
fn malformed_sum_file() -> Result<(), E> {
    let usecase = UseCase::empty()?;
    usecase.write("a.txt", b"hello")?;
    usecase.write(
        "md5sum.txt",
        b"5d41402abc4b2a76b9719d911017c592 a.txt\n5d41402abc4b2a76b9719d911017c592\n",
    )?;
    assert!(matches!(
        runner::verify(&usecase.root, &[Algorithm::Md5], &options(2)),
        Err(E::SumFile(sumfile::E::Parse { line: 2, .. }))
    ));
    usecase.clean()?;
    Ok(())
}

#[test]
fn removed_file() -> Result<(), E> {
    let usecase = UseCase::empty()?;
    usecase.write("a.txt", b"hello")?;
    usecase.write("b.txt", b"world")?;
    runner::hash(&usecase.root, &[Algorithm::Md5], &options(2))?;
    fs::remove_file(usecase.root.join("b.txt"))?;
    assert!(matches!(
        runner::verify(&usecase.root, &[Algorithm::Md5], &options(2)),
        Err(E::Walker(walker::E::Reading(path, _))) if path == usecase.root.join("b.txt")
    ));
    let mut opt = options(2);
    opt.tolerance(Tolerance::LogErrors);
    let summary = runner::verify(&usecase.root, &[Algorithm::Md5], &opt)?;
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.reports[0].failed[0].0, "b.txt");
    assert_eq!(summary.reports[0].matched(), 1);
    usecase.clean()?;
    Ok(())
}

#[test]
fn missing_root() -> Result<(), E> {
    let usecase = UseCase::empty()?;
    let root = usecase.root.join("missing");
    assert!(matches!(
        runner::hash(&root, &[Algorithm::Md5], &options(2)),
        Err(E::Collector(collector::E::NotFound(_)))
    ));
    usecase.clean()?;
    Ok(())
}

#[test]
fn invalid_parallelism() -> Result<(), E> {
    let usecase = UseCase::empty()?;
    usecase.write("a.txt", b"hello")?;
    assert!(matches!(
        runner::hash(&usecase.root, &[Algorithm::Md5], &options(0)),
        Err(E::Walker(walker::E::InvalidThreadsNumber(0, _)))
    ));
    assert!(!usecase.root.join("md5sum.txt").exists());
    usecase.clean()?;
    Ok(())
}

#[test]
fn empty_tree() -> Result<(), E> {
    let usecase = UseCase::empty()?;
    let summary = runner::hash(&usecase.root, &[Algorithm::Md5], &options(2))?;
    assert_eq!(summary.reports[0].files, 0);
    assert_eq!(fs::read_to_string(usecase.root.join("md5sum.txt"))?, "");
    let summary = runner::verify(&usecase.root, &[Algorithm::Md5], &options(2))?;
    assert_eq!(summary.reports[0].total, 0);
    usecase.clean()?;
    Ok(())
}

#[test]
fn vanished_file_with_keep_going() -> Result<(), E> {
    let usecase = UseCase::empty()?;
    usecase.write("a.txt", b"hello")?;
    let gone = usecase.write("sub/b.txt", b"world")?;
    let mut opt = options(2);
    opt.tolerance(Tolerance::LogErrors);
    let pool = opt.walker()?;
    let files = collector::collect(&usecase.root, &pool.breaker(), pool.tolerance(), 2)?;
    assert_eq!(files.len(), 2);
    fs::remove_file(&gone)?;
    let summary = runner::hash_entries(
        &usecase.root,
        files.clone(),
        &[Algorithm::Md5],
        &pool,
        Instant::now(),
    )?;
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.reports[0].files, 1);
    assert_eq!(summary.reports[0].failed[0].0, "sub/b.txt");
    assert!(matches!(
        &summary.reports[0].failed[0].1,
        walker::E::Reading(path, _) if path == &gone
    ));
    assert_eq!(
        fs::read_to_string(usecase.root.join("md5sum.txt"))?,
        "5d41402abc4b2a76b9719d911017c592 a.txt\n"
    );
    fs::remove_file(usecase.root.join("md5sum.txt"))?;
    let pool = options(2).walker()?;
    assert!(matches!(
        runner::hash_entries(&usecase.root, files, &[Algorithm::Md5], &pool, Instant::now()),
        Err(E::Walker(walker::E::Reading(path, _))) if path == gone
    ));
    assert!(!usecase.root.join("md5sum.txt").exists());
    usecase.clean()?;
    Ok(())
}

#[test]
fn spaces_around_names() -> Result<(), E> {
    let usecase = UseCase::empty()?;
    usecase.write("notes.txt ", b"hello")?;
    usecase.write(" leading.txt", b"world")?;
    usecase.write("sub dir/ both ", b"hello")?;
    let opt = options(2);
    let summary = runner::hash(&usecase.root, &[Algorithm::Md5], &opt)?;
    assert_eq!(summary.reports[0].files, 3);
    let summary = runner::verify(&usecase.root, &[Algorithm::Md5], &opt)?;
    assert_eq!(summary.reports[0].total, 3);
    assert_eq!(summary.reports[0].matched(), 3);
    usecase.write("notes.txt ", b"hello!")?;
    let summary = runner::verify(&usecase.root, &[Algorithm::Md5], &opt)?;
    assert_eq!(summary.reports[0].mismatched, vec!["notes.txt ".to_owned()]);
    usecase.clean()?;
    Ok(())
}

#[cfg(unix)]
#[test]
fn not_unicode_name() -> Result<(), E> {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};
    let usecase = UseCase::empty()?;
    usecase.write("a.txt", b"hello")?;
    let bad = usecase.root.join(OsStr::from_bytes(b"bad\xff.txt"));
    fs::write(&bad, b"hello")?;
    let previous = "5d41402abc4b2a76b9719d911017c592 a.txt\n";
    usecase.write("md5sum.txt", previous.as_bytes())?;
    assert!(matches!(
        runner::hash(&usecase.root, &[Algorithm::Md5], &options(2)),
        Err(E::SumFile(sumfile::E::NotUnicode(path))) if path == bad
    ));
    assert_eq!(
        fs::read_to_string(usecase.root.join("md5sum.txt"))?,
        previous
    );
    usecase.clean()?;
    Ok(())
}
