use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// `envsmith` with a scrubbed environment and an empty config home.
fn envsmith(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("envsmith").unwrap();
    cmd.env("XDG_CONFIG_HOME", home)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("ENV_CONFIGURED")
        .env_remove("NON_INTERACTIVE")
        .env_remove("ENVSMITH_SERVICES_ROOT")
        .env_remove("ENVSMITH_TEMPLATE_NAME")
        .env_remove("ENVSMITH_BACKUP_DIR")
        .env("ENVSMITH_BCRYPT_COST", "4");
    cmd
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

const TEMPLATE: &str = "\
# App settings
# PROMPT: Public host name
APP_HOST=app.example.com
# GENERATE[hex,8]: Session key
SESSION_KEY=changeme
# GENERATE[bcrypt]: Dashboard login
BASIC_AUTH=admin:changeme
PLAIN=1
";

#[test]
fn test_version() {
    let temp = TempDir::new().unwrap();
    envsmith(temp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_process_non_interactive() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("app/.env.example");
    write(&template, TEMPLATE);

    envsmith(temp.path())
        .args(["process", "--non-interactive"])
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 processed, 0 failed"));

    let target = fs::read_to_string(temp.path().join("app/.env")).unwrap();
    assert!(target.contains("APP_HOST=app.example.com\n"));
    assert!(target.contains("PLAIN=1\n"));
    assert!(predicate::str::is_match(r"(?m)^SESSION_KEY=[0-9a-f]{8}$").unwrap().eval(&target));
    assert!(target.contains("BASIC_AUTH=admin:$$2b$$04$$"));
}

#[test]
fn test_export_file() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join(".env.example");
    write(&template, "# PROMPT: Time zone\nTZ=Etc/UTC\n# PROMPT: Other\nOTHER=x\n");
    let exports = temp.path().join("exports.sh");

    envsmith(temp.path())
        .args(["process", "--non-interactive", "--export-file"])
        .arg(&exports)
        .arg(&template)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(exports).unwrap(), "export TZ='Etc/UTC'\n");
}

#[test]
fn test_already_configured_short_circuits() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join(".env.example");
    write(&template, TEMPLATE);

    envsmith(temp.path())
        .env("ENV_CONFIGURED", "true")
        .args(["process", "--non-interactive"])
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("already configured"));
    assert!(!temp.path().join(".env").exists());

    envsmith(temp.path())
        .env("ENV_CONFIGURED", "true")
        .args(["process", "--non-interactive", "--force"])
        .arg(&template)
        .assert()
        .success();
    assert!(temp.path().join(".env").exists());
}

#[test]
fn test_missing_required_input_fails() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join(".env.example");
    write(&template, "# PROMPT[password]: Database password\nDB_PASSWORD=changeme\n");

    envsmith(temp.path())
        .env("NON_INTERACTIVE", "yes")
        .arg("process")
        .arg(&template)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stdout(predicate::str::contains("DB_PASSWORD"));
}

#[test]
fn test_underivable_target_fails() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("settings.txt");
    write(&template, "# GENERATE: k\nK=\n");

    envsmith(temp.path())
        .args(["process", "--non-interactive"])
        .arg(&template)
        .assert()
        .failure();

    let target = temp.path().join("settings.env");
    envsmith(temp.path())
        .args(["process", "--non-interactive", "--target"])
        .arg(&target)
        .arg(&template)
        .assert()
        .success();
    assert!(fs::read_to_string(target).unwrap().contains("K="));
}

#[test]
fn test_check_reports_directives() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join(".env.example");
    write(
        &template,
        "# GENERATE[sha1,999]: Weird\nWEIRD=x\n# PROMPT[email]: Mail\nMAIL=a@b.io\n# PROMPT: dangling\n",
    );

    envsmith(temp.path())
        .arg("check")
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("WEIRD"))
        .stdout(predicate::str::contains("type=default size=24"))
        .stdout(predicate::str::contains("type=email"))
        .stdout(predicate::str::contains("orphaned PROMPT directive"));

    assert!(!temp.path().join(".env").exists());
}

#[test]
fn test_generate_hex() {
    let temp = TempDir::new().unwrap();
    envsmith(temp.path())
        .args(["generate", "hex", "--size", "8"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9a-f]{8}\n$").unwrap());
}

#[test]
fn test_generate_bcrypt() {
    let temp = TempDir::new().unwrap();
    envsmith(temp.path())
        .args(["generate", "bcrypt"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("admin:$$2b$$04$$"))
        .stderr(predicate::str::contains("password: "));
}

#[test]
fn test_generate_unknown_type() {
    let temp = TempDir::new().unwrap();
    envsmith(temp.path())
        .args(["generate", "sha512"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid generation type"));
}

fn services_root(temp: &TempDir) -> std::path::PathBuf {
    let root = temp.path().join("services");
    write(&root.join("network/adguard/.env.example"), "# GENERATE[hex,16]: API key\nAPI_KEY=\n");
    write(&root.join("media/jellyfin/.env.example"), "# PROMPT: Library\nLIBRARY=/data/media\n");
    root
}

#[test]
fn test_services_list() {
    let temp = TempDir::new().unwrap();
    let root = services_root(&temp);

    envsmith(temp.path())
        .args(["services", "--root"])
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("network"))
        .stdout(predicate::str::contains("adguard"))
        .stdout(predicate::str::contains("jellyfin"));
}

#[test]
fn test_service_alias_and_unknown() {
    let temp = TempDir::new().unwrap();
    let root = services_root(&temp);

    envsmith(temp.path())
        .args(["service", "pihole", "--non-interactive", "--root"])
        .arg(&root)
        .assert()
        .success();
    assert!(root.join("network/adguard/.env").exists());

    envsmith(temp.path())
        .args(["service", "jellyfin", "plex", "--non-interactive", "--root"])
        .arg(&root)
        .assert()
        .failure()
        .stdout(predicate::str::contains("not found"));
    assert!(root.join("media/jellyfin/.env").exists());
}

#[test]
fn test_all_services() {
    let temp = TempDir::new().unwrap();
    let root = services_root(&temp);

    envsmith(temp.path())
        .env("ENVSMITH_SERVICES_ROOT", &root)
        .args(["all", "--non-interactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 processed, 0 failed"));
}

#[test]
fn test_invalid_config_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.yml");
    write(&config, "template_name: nested/.env.example\n");

    envsmith(temp.path())
        .arg("--config")
        .arg(&config)
        .arg("services")
        .assert()
        .failure()
        .stderr(predicate::str::contains("template_name"));
}
