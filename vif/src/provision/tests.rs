use super::*;
use crate::platform::{AddressFamilies, Darwin, FreeBsd, Linux, OpenBsd};

fn tunnel() -> Provisioner {
    Provisioner::new(InterfaceMode::Tunnel)
}

#[test]
fn automatic_name() {
    let request = tunnel().validate::<Linux>().unwrap();
    assert_eq!(request.name, None);
    assert_eq!(request.flags, InterfaceFlags::empty());
    assert_eq!(request.word, Linux::resolve(InterfaceMode::Tunnel, InterfaceFlags::empty()));

    // An empty name is no name.
    let request = tunnel().name("").validate::<Linux>().unwrap();
    assert_eq!(request.name, None);
}

#[test]
fn explicit_name_is_exclusive() {
    let request = tunnel()
        .name("tun-test0")
        .flags(InterfaceFlags::STRIP_PACKET_INFO)
        .validate::<Linux>()
        .unwrap();
    assert_eq!(request.name.as_deref(), Some("tun-test0"));
    assert!(request.flags.contains(InterfaceFlags::EXCLUSIVE));
    assert_eq!(request.word.bits(), 0x9001);
    assert_eq!(request.framing, Framing::Passthrough);
}

#[test]
fn long_name_fails_before_the_os() {
    let err = tunnel().name("a-name-of-sixteen").validate::<Linux>().unwrap_err();
    match err {
        ProvisionError::NameTooLong { name, limit } => {
            assert_eq!(name, "a-name-of-sixteen");
            assert_eq!(limit, 15);
        },
        other => panic!("Unexpected {:?}", other),
    }

    // Exactly at the limit.
    assert!(tunnel().name("fifteen-bytes-0").validate::<Linux>().is_ok());
}

#[test]
fn invalid_names() {
    for name in &[".", "..", "tun/0", "tun:0", "tun 0", "tun\t0"] {
        let err = tunnel().name(*name).validate::<Linux>().unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidName { .. }), "{:?}", name);
    }

    // Templates are resolved by the kernel.
    assert!(tunnel().name("vif%d").validate::<Linux>().is_ok());
}

#[test]
fn unit_names_on_bsd() {
    let request = tunnel().name("tun3").validate::<FreeBsd>().unwrap();
    assert_eq!(request.name.as_deref(), Some("tun3"));
    assert_eq!(request.word.bits(), 1);

    let err = tunnel().name("tap3").validate::<FreeBsd>().unwrap_err();
    assert!(matches!(err, ProvisionError::InvalidName { .. }));

    let err = tunnel().name("vif%d").validate::<FreeBsd>().unwrap_err();
    assert!(matches!(err, ProvisionError::InvalidName { .. }));
}

#[test]
fn bsd_tap_has_no_header() {
    let err = Provisioner::new(InterfaceMode::Tap).validate::<FreeBsd>().unwrap_err();
    assert!(matches!(err, ProvisionError::Unsupported { platform: "freebsd", .. }));

    let request = Provisioner::new(InterfaceMode::Tap)
        .flags(InterfaceFlags::STRIP_PACKET_INFO)
        .validate::<FreeBsd>()
        .unwrap();
    assert_eq!(request.framing, Framing::Passthrough);
}

#[test]
fn header_stripped_in_user_space() {
    let request = tunnel()
        .flags(InterfaceFlags::STRIP_PACKET_INFO)
        .validate::<OpenBsd>()
        .unwrap();
    assert_eq!(request.framing, Framing::StripFamily(AddressFamilies { inet: 2, inet6: 24 }));

    let request = tunnel().validate::<OpenBsd>().unwrap();
    assert_eq!(request.framing, Framing::Passthrough);
}

#[test]
fn darwin() {
    let err = Provisioner::new(InterfaceMode::Tap).validate::<Darwin>().unwrap_err();
    assert!(matches!(err, ProvisionError::Unsupported { platform: "darwin", .. }));

    assert!(tunnel().name("utun4").validate::<Darwin>().is_ok());
    let err = tunnel().name("tun4").validate::<Darwin>().unwrap_err();
    assert!(matches!(err, ProvisionError::InvalidName { .. }));
}

#[test]
fn confirmed_names() {
    let name = confirm_name::<Linux>(Some("tun-test0"), b"tun-test0".to_vec()).unwrap();
    assert_eq!(name, "tun-test0");

    let name = confirm_name::<Linux>(None, b"tun0".to_vec()).unwrap();
    assert_eq!(name, "tun0");

    let name = confirm_name::<Linux>(Some("vif%d"), b"vif2".to_vec()).unwrap();
    assert_eq!(name, "vif2");
}

#[test]
fn truncated_name_is_rejected() {
    let err = confirm_name::<Linux>(Some("tun-test0"), b"tun-test".to_vec()).unwrap_err();
    match err {
        ProvisionError::NameTooLong { name, .. } => assert_eq!(name, "tun-test0"),
        other => panic!("Unexpected {:?}", other),
    }
}

#[test]
fn garbage_names_are_rejected() {
    let err = confirm_name::<Linux>(None, vec![0xff, 0xfe]).unwrap_err();
    assert!(matches!(err, ProvisionError::ConfigurationRejected { .. }));

    let err = confirm_name::<Linux>(None, Vec::new()).unwrap_err();
    assert!(matches!(err, ProvisionError::ConfigurationRejected { .. }));
}
