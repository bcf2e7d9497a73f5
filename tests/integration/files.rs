//! Sources, configuration, and output on disk.

use std::fs;
use std::path::PathBuf;

use idlbind_engine::MixinCollision;
use idlbind_foundation::ErrorKind;
use idlbind_runtime::{GeneratorConfig, OutputFormat, Pipeline, load_from_file, save_to_file};

/// A scratch directory removed on drop.
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("idlbind_{name}_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn write(&self, file: &str, text: &str) -> PathBuf {
        let path = self.0.join(file);
        fs::write(&path, text).unwrap();
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

const EVENTS: &str = r"
[Exposed=(Window,Worker)]
interface EventTarget {
  constructor();
  boolean dispatchEvent(Event event);
};
[Exposed=(Window,Worker)]
interface Event {
  constructor(DOMString type, optional EventInit eventInitDict = {});
  readonly attribute DOMString type;
};
dictionary EventInit { boolean bubbles = false; };
";

const ABORT: &str = r#"
[Exposed=(Window,Worker)]
interface AbortSignal : EventTarget {
  readonly attribute boolean aborted;
  undefined throwIfAborted();
};
enum AbortReason { "timeout", "user" };
"#;

#[test]
fn files_run_and_save() {
    let scratch = Scratch::new("files_run_and_save");
    let events = scratch.write("events.webidl", EVENTS);
    let abort = scratch.write("abort.webidl", ABORT);

    let mut pipeline = Pipeline::new(GeneratorConfig::default());
    pipeline.add_source(&abort).unwrap();
    pipeline.add_source(&events).unwrap();
    assert_eq!(pipeline.sources().files().count(), 2);

    let output = pipeline.run().unwrap();
    let signal = output.model.interface("AbortSignal").unwrap();
    assert_eq!(signal.ancestry, vec!["EventTarget", "AbortSignal"]);
    assert!(signal.member("dispatchEvent").is_some());
    assert!(!signal.has_constructor());
    assert_eq!(
        output.model.enumeration("AbortReason").unwrap().index_of("user"),
        Some(1)
    );

    for format in [OutputFormat::Json, OutputFormat::Msgpack] {
        let path = scratch.0.join(format!("model.{}", format.extension()));
        save_to_file(&output.model, format, &path).unwrap();
        assert_eq!(load_from_file(&path, format).unwrap(), output.model);
    }
}

#[test]
fn rendered_output_can_be_fed_back() {
    let scratch = Scratch::new("rendered_output");
    let mut pipeline = Pipeline::new(GeneratorConfig::default());
    pipeline.add_source(scratch.write("events.webidl", EVENTS)).unwrap();
    pipeline.add_source(scratch.write("abort.webidl", ABORT)).unwrap();
    let first = pipeline.run().unwrap().model;

    let rendered = scratch.0.join("bindings.webidl");
    save_to_file(&first, OutputFormat::Idl, &rendered).unwrap();

    let mut again = Pipeline::new(GeneratorConfig::default());
    again.add_source(&rendered).unwrap();
    let second = again.run().unwrap().model;

    let names = |model: &idlbind_emit::BindingModel, name: &str| -> Vec<String> {
        model
            .interface(name)
            .unwrap()
            .members
            .iter()
            .map(|m| m.name.clone())
            .collect()
    };
    assert_eq!(names(&first, "AbortSignal"), names(&second, "AbortSignal"));
    assert_eq!(first.enums(), second.enums());
    assert_eq!(first.dictionaries(), second.dictionaries());
}

#[test]
fn configuration_file_drives_the_run() {
    let scratch = Scratch::new("configuration_file");
    let config = scratch.write(
        "idlbind.toml",
        "format = \"msgpack\"\nstrict = true\nmixin_collision = \"reject\"\n",
    );
    let config = GeneratorConfig::load(&config).unwrap();
    assert_eq!(config.format, OutputFormat::Msgpack);
    assert!(config.strict);
    assert_eq!(config.mixin_collision, MixinCollision::Reject);
    assert!(!config.fail_on_syntax_errors);

    let mut pipeline = Pipeline::new(config);
    pipeline
        .add_source(scratch.write("pref.webidl", "[Pref=\"x\"] interface P {};"))
        .unwrap();
    let err = pipeline.run().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidExtendedAttribute { .. }));
    let context = err.context.unwrap();
    assert!(context.source.unwrap().ends_with("pref.webidl"));
}

#[test]
fn bad_configuration_is_reported() {
    let scratch = Scratch::new("bad_configuration");
    let path = scratch.write("idlbind.toml", "colour = \"blue\"\n");
    let err = GeneratorConfig::load(&path).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Config(_)));
    assert!(err.to_string().contains("idlbind.toml"));

    let err = GeneratorConfig::load(scratch.0.join("missing.toml")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Io(_)));
}
