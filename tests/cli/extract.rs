use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

#[test]
fn test_extract_markup_and_scripts() -> Result<()> {
    let test = CliTest::with_file(
        "src/index.html",
        r#"<div>
  <h1 translate>HOME.TITLE</h1>
  <p i18n="Welcome page@@HOME.WELCOME">Welcome!</p>
  <input placeholder="{{ 'FORM.NAME' | translate }}">
</div>
"#,
    )?;
    test.write_file(
        "src/app.js",
        r#"angular.module('app').controller('Main', function ($translate) {
  $translate('HOME.TITLE');
  i18n.registerTranslations({ 'NAV.BACK': 'Back' });
});
"#,
    )?;

    assert_cmd_snapshot!(test.extract_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Extracted 4 translations from 2 files (1 markup, 1 script) into ./translations.json

    ----- stderr -----
    ");

    assert_eq!(
        test.read_file("translations.json")?,
        r#"{
  "FORM.NAME": "FORM.NAME",
  "HOME.TITLE": "HOME.TITLE",
  "HOME.WELCOME": "Welcome!",
  "NAV.BACK": "Back"
}
"#
    );

    Ok(())
}

#[test]
fn test_extract_reports_dynamic_id() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.js",
        "function load(key) {\n  return $translate(key);\n}\n",
    )?;

    assert_cmd_snapshot!(test.extract_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    error: $translate() argument is not a string literal or an array of string literals, dynamic translation ids are not supported
      --> src/app.js:2:9
      |
    2 |   return $translate(key);
      |          ^

    ✘ 1 problems (1 error, 0 warnings)
    ✘ Extracted 0 translations from 1 file (0 markup, 1 script) into ./translations.json

    ----- stderr -----
    ");

    assert_eq!(test.read_file("translations.json")?, "{}\n");

    Ok(())
}

#[test]
fn test_extract_suppression_comment() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.js",
        "function load(key) {\n  // suppress-dynamic-translation-error: true\n  return $translate(key);\n}\n",
    )?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());

    Ok(())
}

#[test]
fn test_extract_suppression_attribute() -> Result<()> {
    let test = CliTest::with_file(
        "src/view.html",
        "<section suppress-dynamic-translation-error>\n  <p>{{ vm.label | translate }}</p>\n</section>\n<p>{{ vm.other | translate }}</p>\n",
    )?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--> src/view.html:4:"), "{}", stdout);
    assert!(stdout.contains("1 problems (1 error, 0 warnings)"), "{}", stdout);

    Ok(())
}

#[test]
fn test_extract_conflicting_default_text() -> Result<()> {
    let test = CliTest::with_file(
        "src/a.html",
        r#"<p i18n="@@SAVE">Save</p>"#,
    )?;
    test.write_file("src/b.html", r#"<p i18n="@@SAVE">Store</p>"#)?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--> src/b.html:1:"), "{}", stdout);
    assert_eq!(test.read_file("translations.json")?, "{\n  \"SAVE\": \"Save\"\n}\n");

    Ok(())
}

#[test]
fn test_extract_parse_error() -> Result<()> {
    let test = CliTest::with_file("src/broken.js", "i18n.registerTranslation('A'\n")?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("failed to parse script"), "{}", stdout);
    assert!(stdout.contains("--> src/broken.js\n"), "{}", stdout);

    Ok(())
}

#[test]
fn test_extract_emit_dir() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.js",
        "export const TITLE = i18n.registerTranslation('APP.TITLE', 'Glean');\n",
    )?;

    let output = test
        .extract_command()
        .args(["--emit-dir", "build"])
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        test.read_file("build/src/app.js")?,
        "export const TITLE = \"APP.TITLE\";\n"
    );
    assert_eq!(
        test.read_file("src/app.js")?,
        "export const TITLE = i18n.registerTranslation('APP.TITLE', 'Glean');\n"
    );

    Ok(())
}

#[test]
fn test_extract_output_and_config_overrides() -> Result<()> {
    let test = CliTest::with_file(
        ".gleanrc.json",
        r#"{ "includes": ["web"], "extractors": ["directive"], "serviceIdentifier": "tr" }"#,
    )?;
    test.write_file("web/view.html", r#"<p i18n="@@IGNORED">x</p><b translate="OK"></b>"#)?;
    test.write_file("web/app.ts", "tr('TS.KEY');\n$translate('OTHER.SERVICE');\n")?;

    let output = test
        .extract_command()
        .args(["--output", "dist/en.json"])
        .output()?;

    assert!(
        output.status.success(),
        "stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    assert_eq!(
        test.read_file("dist/en.json")?,
        "{\n  \"OK\": \"OK\",\n  \"TS.KEY\": \"TS.KEY\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_extract_invalid_config() -> Result<()> {
    let test = CliTest::with_file(".gleanrc.json", r#"{ "ignores": ["[oops"] }"#)?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: "), "{}", stderr);
    assert!(stderr.contains("Invalid glob pattern in 'ignores'"), "{}", stderr);

    Ok(())
}
