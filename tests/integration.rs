//! End-to-end scans over in-memory registries.

use pywin_inventory::registry::{MemoryKey, MemoryRegistry};
use pywin_inventory::scan::{scan_pep514, scan_uninstall_entries};
use pywin_inventory::{collect, Bitness, InventoryError, RegistryView, Result, ScanConfig};

const USER_ROOT: &str = r"\REGISTRY\USER\S-1-5-21-3623811015-3361044348-30300820-1013";

fn uninstall_tree(records: MemoryKey) -> MemoryKey {
    MemoryKey::new().with_subkey(
        "SOFTWARE",
        MemoryKey::new().with_subkey(
            "Microsoft",
            MemoryKey::new().with_subkey(
                "Windows",
                MemoryKey::new().with_subkey(
                    "CurrentVersion",
                    MemoryKey::new().with_subkey("Uninstall", records),
                ),
            ),
        ),
    )
}

fn python_tree(companies: MemoryKey) -> MemoryKey {
    MemoryKey::new().with_subkey("SOFTWARE", MemoryKey::new().with_subkey("Python", companies))
}

fn three_records() -> MemoryKey {
    MemoryKey::new()
        .with_subkey(
            "{A1}",
            MemoryKey::new()
                .with_value("Publisher", "Microsoft Corporation")
                .with_value("DisplayName", "Python 3.11.4 (64-bit)"),
        )
        .with_subkey(
            "{B2}",
            MemoryKey::new()
                .with_value("Publisher", "Python Software Foundation")
                .with_value("DisplayName", "Python 3.12.1 (64-bit)")
                .with_value("InstallSource", r"C:\Users\dev\Downloads\"),
        )
        .with_subkey(
            "{C3}",
            MemoryKey::new().with_value("DisplayName", "Python 3.10.0 (64-bit)"),
        )
}

#[test]
fn test_uninstall_only_psf_publisher() {
    let view = RegistryView::local_machine(Bitness::Bits64);
    let registry =
        MemoryRegistry::new().with_view(view, r"\REGISTRY\MACHINE", uninstall_tree(three_records()));

    let entries: Vec<_> = scan_uninstall_entries(&registry, view)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.display_name.as_deref(), Some("Python 3.12.1 (64-bit)"));
    assert_eq!(entry.install_source.as_deref(), Some(r"C:\Users\dev\Downloads\"));
    assert_eq!(
        entry.registry_path,
        r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall\{B2}"
    );
}

#[test]
fn test_uninstall_scan_is_restartable() {
    let view = RegistryView::current_user();
    let registry = MemoryRegistry::new().with_view(view, USER_ROOT, uninstall_tree(three_records()));

    let first: Vec<_> = scan_uninstall_entries(&registry, view)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    let second: Vec<_> = scan_uninstall_entries(&registry, view)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first[0].registry_path,
        r"HKEY_CURRENT_USER\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall\{B2}"
    );
}

#[test]
fn test_pep514_only_python_core() {
    let companies = MemoryKey::new()
        .with_subkey(
            "OtherCorp",
            MemoryKey::new().with_subkey(
                "1.0",
                MemoryKey::new().with_value("DisplayName", "Other Python 1.0"),
            ),
        )
        .with_subkey(
            "PythonCore",
            MemoryKey::new()
                .with_subkey(
                    "3.12",
                    MemoryKey::new()
                        .with_value("DisplayName", "Python 3.12 (64-bit)")
                        .with_subkey(
                            "InstallPath",
                            MemoryKey::new()
                                .with_value("", r"C:\Program Files\Python312\")
                                .with_value("ExecutablePath", r"C:\Program Files\Python312\python.exe"),
                        ),
                )
                .with_subkey(
                    "3.9-32",
                    MemoryKey::new().with_value("DisplayName", "Python 3.9 (32-bit)"),
                ),
        );
    let view = RegistryView::local_machine(Bitness::Bits32);
    let registry = MemoryRegistry::new().with_view(view, r"\REGISTRY\MACHINE", python_tree(companies));

    let entries: Vec<_> = scan_pep514(&registry, view)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();

    let names: Vec<_> = entries.iter().map(|e| e.display_name.as_deref()).collect();
    assert_eq!(names, [Some("Python 3.12 (64-bit)"), Some("Python 3.9 (32-bit)")]);
    assert_eq!(entries[0].install_path, r"C:\Program Files\Python312\");
    assert_eq!(entries[1].install_path, "");
}

#[test]
fn test_pep514_missing_install_path_is_empty() {
    let companies = MemoryKey::new()
        .with_subkey(
            "OtherCorp",
            MemoryKey::new().with_subkey("1.0", MemoryKey::new()),
        )
        .with_subkey(
            "PythonCore",
            MemoryKey::new()
                .with_subkey(
                    "3.12",
                    MemoryKey::new()
                        .with_value("DisplayName", "Python 3.12 (64-bit)")
                        .with_subkey(
                            "InstallPath",
                            MemoryKey::new().with_value("", r"C:\Python312\"),
                        ),
                )
                .with_subkey(
                    "3.9",
                    MemoryKey::new().with_value("DisplayName", "Python 3.9 (64-bit)"),
                ),
        );
    let view = RegistryView::local_machine(Bitness::Bits64);
    let registry = MemoryRegistry::new().with_view(view, r"\REGISTRY\MACHINE", python_tree(companies));

    let entries: Vec<_> = scan_pep514(&registry, view)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].install_path, r"C:\Python312\");
    assert_eq!(
        entries[0].registry_path,
        r"HKEY_LOCAL_MACHINE\SOFTWARE\Python\PythonCore\3.12"
    );
    assert_eq!(entries[1].display_name.as_deref(), Some("Python 3.9 (64-bit)"));
    assert_eq!(entries[1].install_path, "");
    assert!(entries.iter().all(|e| !e.registry_path.contains("OtherCorp")));
}

#[test]
fn test_collect_continues_past_missing_views() {
    let user = RegistryView::current_user();
    let registry = MemoryRegistry::new().with_view(
        user,
        USER_ROOT,
        uninstall_tree(three_records()),
    );
    let dir = tempfile::tempdir().unwrap();
    let config = ScanConfig::new("").with_windows_apps_dir(dir.path().join("WindowsApps"));

    let inventory = collect(&registry, &config).unwrap();

    assert_eq!(inventory.uninstall.len(), 3);
    assert_eq!(inventory.uninstall[0].entries.len(), 1);
    assert!(inventory.uninstall[0].warning.is_none());
    assert!(inventory.uninstall[1].warning.is_some());
    assert!(inventory.uninstall[2].warning.is_some());

    // No SOFTWARE\Python anywhere: every PEP 514 view warns, none aborts.
    assert_eq!(inventory.pep514.len(), 3);
    assert!(inventory.pep514.iter().all(|s| s.entries.is_empty() && s.warning.is_some()));

    assert!(inventory.store.packages.is_empty());
    assert!(inventory.store.warning.is_some());
    assert!(inventory.path.is_empty());
    assert_eq!(inventory.total_entries(), 1);
}

#[test]
fn test_collect_aborts_on_unrecognized_kernel_path() {
    let view = RegistryView::local_machine(Bitness::Bits64);
    let registry = MemoryRegistry::new().with_view(
        view,
        r"\REGISTRY\WC\Silo",
        uninstall_tree(three_records()),
    );

    let err = collect(&registry, &ScanConfig::new("")).unwrap_err();
    assert!(matches!(err, InventoryError::UnrecognizedPath(_)));
}

#[test]
fn test_collect_without_store_directory() {
    let inventory = collect(&MemoryRegistry::new(), &ScanConfig::new("")).unwrap();
    assert!(inventory.store.warning.is_some());
    assert_eq!(inventory.total_entries(), 0);
}
