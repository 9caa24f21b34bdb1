//! End-to-end discovery cycles against a fake sysfs/procfs tree.

use std::fs;
use std::path::PathBuf;

use nodefeat_core::config::HostPaths;
use nodefeat_core::{configure_sources, FeatureSource, FeatureValue, Features};
use nodefeat_rules::merge::Provenance;
use nodefeat_rules::probes::HostContext;
use nodefeat_rules::schema::FeatureSpec;
use nodefeat_rules::{CustomConfig, CustomSource};
use tempfile::TempDir;

/// A host with no PCI devices, no modules, and an AVX2-capable CPU.
struct FakeHost {
    root: TempDir,
}

impl FakeHost {
    fn new() -> Self {
        let root = TempDir::new().expect("create tempdir");
        fs::create_dir_all(root.path().join("sys/bus/pci/devices")).unwrap();
        fs::create_dir_all(root.path().join("proc")).unwrap();
        fs::create_dir_all(root.path().join("custom.d")).unwrap();
        fs::write(root.path().join("proc/modules"), "").unwrap();
        fs::write(
            root.path().join("proc/cpuinfo"),
            "processor\t: 0\nflags\t\t: fpu sse2 avx avx2\n",
        )
        .unwrap();
        Self { root }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    fn add_pci_device(&self, addr: &str, class: &str, vendor: &str, device: &str) {
        let dir = self.path("sys/bus/pci/devices").join(addr);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("class"), format!("0x{class}\n")).unwrap();
        fs::write(dir.join("vendor"), format!("0x{vendor}\n")).unwrap();
        fs::write(dir.join("device"), format!("0x{device}\n")).unwrap();
    }

    fn load_modules(&self, modules: &[&str]) {
        let contents: String = modules
            .iter()
            .map(|m| format!("{m} 16384 0 - Live 0x0000000000000000\n"))
            .collect();
        fs::write(self.path("proc/modules"), contents).unwrap();
    }

    fn write_config(&self, name: &str, yaml: &str) {
        fs::write(self.path("custom.d").join(name), yaml).unwrap();
    }

    fn source(&self, node_name: &str) -> CustomSource {
        let paths = HostPaths {
            sysfs_root: self.path("sys"),
            procfs_root: self.path("proc"),
            boot_root: self.path("boot"),
            kconfig_file: None,
        };
        CustomSource::new(HostContext::new(node_name, paths), self.path("custom.d"))
    }
}

fn with_runtime(mut source: CustomSource, yaml: &str) -> CustomSource {
    let specs = FeatureSpec::parse_list(yaml).unwrap();
    source.set_config(Box::new(CustomConfig(specs))).unwrap();
    source
}

fn discover(source: &CustomSource) -> Features {
    source.discover().expect("discovery never fails")
}

const HAS_FOO: &str = r#"
- name: has_foo
  matchOn:
    - hostname: ["^node-a$"]
"#;

#[test]
fn hostname_match_emits_true() {
    let host = FakeHost::new();
    let source = with_runtime(host.source("node-a"), HAS_FOO);

    let features = discover(&source);
    assert_eq!(features.get("has_foo"), Some(&FeatureValue::Bool(true)));
}

#[test]
fn hostname_mismatch_emits_nothing() {
    let host = FakeHost::new();
    let source = with_runtime(host.source("node-b"), HAS_FOO);

    assert!(!discover(&source).contains_key("has_foo"));
}

#[test]
fn override_value_is_emitted_verbatim() {
    let host = FakeHost::new();
    let source = with_runtime(
        host.source("node-a"),
        r#"
- name: tier
  value: gold
  matchOn:
    - cpuId: ["AVX2"]
"#,
    );

    assert_eq!(
        discover(&source).get("tier"),
        Some(&FeatureValue::Str("gold".to_string()))
    );
}

#[test]
fn vacuous_alternative_always_matches() {
    let host = FakeHost::new();
    let source = with_runtime(
        host.source("node-b"),
        r#"
- name: always
  matchOn:
    - hostname: ["^x"]
    - {}
"#,
    );

    assert_eq!(discover(&source).get("always"), Some(&FeatureValue::Bool(true)));
}

#[test]
fn unknown_field_file_is_skipped_and_discovery_completes() {
    let host = FakeHost::new();
    host.write_config("a-broken.yaml", "- name: broken\n  foo: bar\n  matchOn: [{}]\n");
    host.write_config("b-valid.yaml", "- name: from-dir\n  matchOn: [{}]\n");
    let source = with_runtime(host.source("node-a"), HAS_FOO);

    let features = discover(&source);
    assert!(!features.contains_key("broken"));
    assert!(features.contains_key("from-dir"));
    assert!(features.contains_key("has_foo"));
}

#[test]
fn rule_error_omits_only_that_feature() {
    let host = FakeHost::new();
    let source = with_runtime(
        host.source("node-a"),
        r#"
- name: bad-regex
  matchOn:
    - hostname: ["node-(["]
    - {}
- name: has_foo
  matchOn:
    - hostname: ["^node-a$"]
"#,
    );

    let features = discover(&source);
    assert!(!features.contains_key("bad-regex"));
    assert_eq!(features.get("has_foo"), Some(&FeatureValue::Bool(true)));
}

#[test]
fn missing_config_directory_is_not_an_error() {
    let host = FakeHost::new();
    fs::remove_dir(host.path("custom.d")).unwrap();
    let source = with_runtime(host.source("node-a"), HAS_FOO);

    assert!(discover(&source).contains_key("has_foo"));
}

#[test]
fn unreadable_config_directory_keeps_other_specs() {
    let host = FakeHost::new();
    fs::remove_dir(host.path("custom.d")).unwrap();
    fs::write(host.path("custom.d"), "- name: from-dir\n  matchOn: [{}]\n").unwrap();
    host.add_pci_device("0000:3b:00.0", "020000", "15b3", "1017");
    let source = with_runtime(host.source("node-a"), HAS_FOO);

    let features = discover(&source);
    assert!(!features.contains_key("from-dir"));
    assert_eq!(features.get("has_foo"), Some(&FeatureValue::Bool(true)));
    assert_eq!(features.get("rdma.capable"), Some(&FeatureValue::Bool(true)));
}

#[test]
fn malformed_pci_class_does_not_abort_the_cycle() {
    let host = FakeHost::new();
    host.add_pci_device("0000:00:02.0", "00€", "8086", "3e92");
    let source = with_runtime(
        host.source("node-a"),
        r#"
- name: display
  matchOn:
    - pciId: {class: ["0300"]}
- name: has_foo
  matchOn:
    - hostname: ["^node-a$"]
"#,
    );

    let features = discover(&source);
    assert!(!features.contains_key("display"));
    assert_eq!(features.get("has_foo"), Some(&FeatureValue::Bool(true)));
}

#[test]
fn static_defaults_detect_rdma() {
    let host = FakeHost::new();
    let source = host.source("node-a");
    assert!(discover(&source).is_empty());

    host.add_pci_device("0000:3b:00.0", "020000", "15b3", "1017");
    host.load_modules(&["ib_uverbs", "rdma_ucm"]);

    let features = discover(&source);
    assert_eq!(features.get("rdma.capable"), Some(&FeatureValue::Bool(true)));
    assert_eq!(features.get("rdma.available"), Some(&FeatureValue::Bool(true)));
}

#[test]
fn merge_order_is_static_runtime_dynamic() {
    let host = FakeHost::new();
    host.write_config("extra.yaml", "- name: dyn\n  matchOn: [{}]\n");
    let source = with_runtime(host.source("node-a"), "- name: rt\n  matchOn: [{}]\n");

    let provenances: Vec<Provenance> = source
        .merged_specs()
        .into_iter()
        .map(|m| m.provenance)
        .collect();
    assert_eq!(
        provenances,
        vec![
            Provenance::Static,
            Provenance::Static,
            Provenance::Runtime,
            Provenance::Dynamic(host.path("custom.d").join("extra.yaml")),
        ]
    );
}

#[test]
fn later_duplicate_overwrites_earlier_match() {
    let host = FakeHost::new();
    host.write_config("override.yaml", "- name: tier\n  value: silver\n  matchOn: [{}]\n");
    let source = with_runtime(
        host.source("node-a"),
        "- name: tier\n  value: gold\n  matchOn: [{}]\n",
    );

    assert_eq!(
        discover(&source).get("tier"),
        Some(&FeatureValue::Str("silver".to_string()))
    );
}

#[test]
fn unmatched_later_duplicate_keeps_earlier_value() {
    let host = FakeHost::new();
    host.write_config("never.yaml", "- name: tier\n  value: silver\n  matchOn: []\n");
    let source = with_runtime(
        host.source("node-a"),
        "- name: tier\n  value: gold\n  matchOn: [{}]\n",
    );

    assert_eq!(
        discover(&source).get("tier"),
        Some(&FeatureValue::Str("gold".to_string()))
    );
}

#[test]
fn discovery_is_idempotent() {
    let host = FakeHost::new();
    host.write_config("extra.yaml", "- name: dyn\n  value: x\n  matchOn: [{}]\n");
    let source = with_runtime(host.source("node-a"), HAS_FOO);

    assert_eq!(discover(&source), discover(&source));
}

#[test]
fn worker_config_file_feeds_runtime_specs() {
    let host = FakeHost::new();
    let mut sources: Vec<Box<dyn FeatureSource>> = vec![Box::new(host.source("node-a"))];

    configure_sources(
        &mut sources,
        r#"
sources:
  custom:
    - name: has_foo
      matchOn:
        - hostname: ["^node-a$"]
"#,
    )
    .unwrap();

    let features = sources[0].discover().unwrap();
    assert_eq!(features.get("has_foo"), Some(&FeatureValue::Bool(true)));
}

#[test]
fn directory_changes_apply_on_next_cycle() {
    let host = FakeHost::new();
    let source = host.source("node-a");
    assert!(!discover(&source).contains_key("late"));

    host.write_config("late.yaml", "- name: late\n  matchOn: [{}]\n");
    assert!(discover(&source).contains_key("late"));
}
