//! End-to-end commit flow driven by scripted prompt input.

use std::env;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use git2::{Repository, Signature};
use gitflow::cli::CommitCommand;
use gitflow::store::{Database, PatternStore};

fn add_commit(repo: &Repository, message: &str, file_name: &str, content: &str) -> Result<()> {
    let workdir = repo.workdir().unwrap().to_path_buf();
    fs::write(workdir.join(file_name), content)?;

    let mut index = repo.index()?;
    index.add_path(Path::new(file_name))?;
    index.write()?;

    let signature = Signature::now("Test User", "test@example.com")?;
    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(_) => None,
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
    Ok(())
}

fn stage(repo: &Repository, file_name: &str, content: &str) -> Result<()> {
    let workdir = repo.workdir().unwrap().to_path_buf();
    let path = workdir.join(file_name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    let mut index = repo.index()?;
    index.add_path(Path::new(file_name))?;
    index.write()?;
    Ok(())
}

fn head_summary(repo: &Repository) -> Result<String> {
    let head = repo.head()?.peel_to_commit()?;
    Ok(head.summary().unwrap_or("").to_string())
}

// All stages run in a single test because the flow resolves the repository
// from the current directory.
#[test]
fn commit_flow_stages() -> Result<()> {
    let repo_dir = tempfile::tempdir()?;
    let store_dir = tempfile::tempdir()?;

    let repo = Repository::init(repo_dir.path())?;
    let mut config = repo.config()?;
    config.set_str("user.name", "Test User")?;
    config.set_str("user.email", "test@example.com")?;
    add_commit(&repo, "Initial commit", "a.txt", "hello\n")?;

    let db = Database::open(store_dir.path().join("gitflow.db"))?;
    let store = PatternStore::new(db.connection());
    let root = repo.workdir().unwrap().to_string_lossy().to_string();

    let original_dir = env::current_dir()?;
    env::set_current_dir(repo_dir.path())?;

    let result = (|| -> Result<()> {
        // Nothing staged: advisory outcome, no commit, no pattern.
        let cmd = CommitCommand {
            message: None,
            skip_hooks: false,
        };
        let mut input = Cursor::new(b"" as &[u8]);
        cmd.run(&store, true, &mut input)?;
        assert_eq!(head_summary(&repo)?, "Initial commit");
        assert!(store.top_patterns(&root, 10)?.is_empty());

        // Accept the generated suggestion: choice 1, then default confirm.
        stage(&repo, "lib/helper.txt", "plain addition\n")?;
        let cmd = CommitCommand {
            message: None,
            skip_hooks: false,
        };
        let mut input = Cursor::new(b"1\n\n" as &[u8]);
        cmd.run(&store, true, &mut input)?;

        let expected = "change(lib): update lib/helper.txt";
        assert_eq!(head_summary(&repo)?, expected);

        let patterns = store.top_patterns(&root, 10)?;
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].commit_type, "change(lib)");
        assert_eq!(patterns[0].message_format, expected);
        assert_eq!(patterns[0].frequency, 1);

        // A literal -m message commits immediately and records nothing.
        stage(&repo, "lib/helper.txt", "plain addition\nsecond pass\n")?;
        let cmd = CommitCommand {
            message: Some("direct entry".to_string()),
            skip_hooks: false,
        };
        let mut input = Cursor::new(b"" as &[u8]);
        cmd.run(&store, true, &mut input)?;
        assert_eq!(head_summary(&repo)?, "direct entry");
        assert_eq!(store.top_patterns(&root, 10)?.len(), 1);

        // Declining the confirmation leaves the repository untouched.
        stage(&repo, "lib/helper.txt", "plain addition\nthird pass\n")?;
        let cmd = CommitCommand {
            message: None,
            skip_hooks: false,
        };
        let mut input = Cursor::new(b"1\nn\n" as &[u8]);
        cmd.run(&store, true, &mut input)?;
        assert_eq!(head_summary(&repo)?, "direct entry");
        assert_eq!(store.top_patterns(&root, 10)?.len(), 1);

        // Custom message path with validation retry, then accept.
        let cmd = CommitCommand {
            message: None,
            skip_hooks: false,
        };
        // Choice 3 is the custom-message escape (suggestion + one stored
        // pattern come first); the blank line exercises the validation
        // re-prompt.
        let custom = b"3\n\nfix: custom wording\ny\n";
        let mut input = Cursor::new(custom as &[u8]);
        cmd.run(&store, true, &mut input)?;
        assert_eq!(head_summary(&repo)?, "fix: custom wording");

        let patterns = store.top_patterns(&root, 10)?;
        assert_eq!(patterns.len(), 2);
        assert!(patterns.iter().any(|p| p.commit_type == "fix"));

        Ok(())
    })();

    env::set_current_dir(&original_dir)?;
    result
}
