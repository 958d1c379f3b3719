//! Integration tests for the full template pipeline

use std::fs;
use std::path::Path;

use landed_templates::{run, PipelineConfig, TemplateError};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn create_test_mod() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "map/default.map",
        b"definitions = \"definition.csv\"\ngeographical_region = \"geographical_region.txt\"\n",
    );
    write(
        root,
        "map/definition.csv",
        b"province;red;green;blue;x;x\n1;10;20;30;Testby;x\n2;10;20;31;Farholm;x\n10;10;20;32;Tenth;x\n",
    );
    write(root, "history/provinces/1 - Testby.txt", b"title = c_test\nculture = norse\n");
    write(root, "history/provinces/2 - Farholm.txt", b"culture = norse\n");
    // Name disagrees with the definitions table
    write(root, "history/provinces/10 - Wrong.txt", b"title = c_test\n");
    write(
        root,
        "map/geographical_region.txt",
        b"# Regions\nworld_north = { duchies = { d_test } }\nworld_europe = { regions = { world_north } }\nworld_south = { duchies = { d_far } }\n",
    );
    write(
        root,
        "common/cultures/00_cultures.txt",
        b"north_germanic = {\n    graphical_cultures = { norsegfx }\n    norse = { color = { 0.2 0.2 0.6 } }\n}\n",
    );
    write(
        root,
        "common/landed_titles/00_titles.txt",
        br#"
e_test = {
    k_test = {
        title = "KING"
        d_test = {
            norse = "Testmark"
            c_test = {
                b_test = { }
            }
        }
    }
}
k_lonely = { }
"#,
    );
    write(
        root,
        "localisation/00_base.csv",
        b"#CODE;ENGLISH;FRENCH;x\nk_test;Testland;;x\nk_test_adj;Testish;;x\nc_test;Testby County;;x\nPROV1;Testby;;x\nPROV2;Farholm;;x\nPROV10;Bod\xf8;;x\n",
    );
    write(root, "localisation/zz_override.csv", b"k_test;Testrealm;;x\n");

    dir
}

#[test]
fn test_end_to_end_tables() {
    let dir = create_test_mod();
    let templates = dir.path().join("templates");

    let summary = run(dir.path(), &templates, &PipelineConfig::default()).unwrap();

    let north = fs::read_to_string(templates.join("zz~_titles_north.csv")).unwrap();
    assert_eq!(
        north,
        "#TITLE,KEY,VALUE,SOURCE\r\n\
         e_test,e_test,,\r\n\
         e_test,e_test_adj,,\r\n\
         k_test,title,,KING\r\n\
         k_test,k_test,,Testrealm\r\n\
         k_test,k_test_adj,,Testish\r\n\
         d_test,norse,,Testmark\r\n\
         d_test,d_test,,\r\n\
         d_test,d_test_adj,,\r\n\
         c_test,PROV1,,Testby\r\n\
         c_test,c_test,,Testby County\r\n\
         c_test,c_test_adj,,\r\n\
         b_test,b_test,,\r\n\
         b_test,b_test_adj,,\r\n"
    );

    let titular = fs::read_to_string(templates.join("zz~_titles_titular.csv")).unwrap();
    assert_eq!(
        titular,
        "#TITLE,KEY,VALUE,SOURCE\r\nk_lonely,k_lonely,,\r\nk_lonely,k_lonely_adj,,\r\n"
    );

    let other = fs::read_to_string(templates.join("zz~_provinces_other.csv")).unwrap();
    assert_eq!(
        other,
        "#KEY,VALUE,SOURCE\r\nPROV2,,Farholm\r\nPROV10,,Bod\u{f8}\r\n"
    );

    // d_far is declared but never defined; no file for the south region
    assert!(!templates.join("zz~_titles_south.csv").exists());

    assert_eq!(summary.titles, 6);
    assert_eq!(summary.cultures, 1);
    assert_eq!(summary.mapped_provinces, 1);
    assert_eq!(summary.files_written, 3);
    assert_eq!(summary.buckets["north"], 5);
    assert_eq!(summary.buckets["titular"], 1);
    assert_eq!(summary.inference.unresolved, 1);
}

#[test]
fn test_second_run_carries_previous_values() {
    let dir = create_test_mod();
    let templates = dir.path().join("templates");
    run(dir.path(), &templates, &PipelineConfig::default()).unwrap();

    // Translators fill in the VALUE column between runs
    fs::write(
        templates.join("zz~_titles_north.csv"),
        "#TITLE,KEY,VALUE,SOURCE\r\n\
         k_test,k_test,Testrike,Testrealm\r\n\
         k_test,k_test_adj_saxon,Saxish,\r\n\
         d_gone,d_gone,Gone,\r\n",
    )
    .unwrap();
    fs::write(
        templates.join("zz~_provinces_other.csv"),
        "#KEY,VALUE,SOURCE\r\nPROV2,Farholmen,Farholm\r\nPROV3,Old,\r\n",
    )
    .unwrap();

    let summary = run(dir.path(), &templates, &PipelineConfig::default()).unwrap();

    let north = fs::read_to_string(templates.join("zz~_titles_north.csv")).unwrap();
    assert!(north.contains("k_test,k_test,Testrike,Testrealm\r\nk_test,k_test_adj,,Testish\r\nk_test,k_test_adj_saxon,Saxish,\r\n"));

    let titular = fs::read_to_string(templates.join("zz~_titles_titular.csv")).unwrap();
    assert!(titular.ends_with("d_gone,d_gone,Gone,\r\n"));

    let other = fs::read_to_string(templates.join("zz~_provinces_other.csv")).unwrap();
    assert_eq!(
        other,
        "#KEY,VALUE,SOURCE\r\nPROV2,Farholmen,Farholm\r\nPROV3,Old,\r\nPROV10,,Bod\u{f8}\r\n"
    );

    assert_eq!(summary.carried_titles, 1);
    assert_eq!(summary.carried_keys, 1);
}

#[test]
fn test_malformed_region_aborts_without_output() {
    let dir = create_test_mod();
    write(
        dir.path(),
        "map/geographical_region.txt",
        b"world_bad = { duchies = { d_test } color = { 1 2 3 } capital = 1 }\n",
    );
    let templates = dir.path().join("templates");

    let result = run(dir.path(), &templates, &PipelineConfig::default());

    match result {
        Err(TemplateError::MalformedRegion { region, children }) => {
            assert_eq!(region, "world_bad");
            assert_eq!(children, vec!["color", "capital"]);
        }
        other => panic!("expected malformed region, got {:?}", other.map(|s| s.titles)),
    }
    assert!(!templates.exists());
}

#[test]
fn test_syntax_error_names_file() {
    let dir = create_test_mod();
    write(dir.path(), "common/landed_titles/01_broken.txt", b"k_broken = {\n    title = \n");
    let templates = dir.path().join("templates");

    let err = run(dir.path(), &templates, &PipelineConfig::default()).unwrap_err();
    match err {
        TemplateError::Script { path, .. } => {
            assert!(path.ends_with("01_broken.txt"));
        }
        other => panic!("expected syntax error, got {}", other),
    }
}

#[test]
fn test_config_overrides_naming() {
    let dir = create_test_mod();
    let config_path = dir.path().join("templates.toml");
    fs::write(
        &config_path,
        "titular_bucket = \"unlanded\"\n\n[output]\nsource_column = \"TESTMOD\"\n",
    )
    .unwrap();
    let config = PipelineConfig::load(&config_path).unwrap();
    let templates = dir.path().join("out/templates");

    run(dir.path(), &templates, &config).unwrap();

    let unlanded = fs::read_to_string(templates.join("zz~_titles_unlanded.csv")).unwrap();
    assert!(unlanded.starts_with("#TITLE,KEY,VALUE,TESTMOD\r\n"));
}
