use super::*;

const MODES: [InterfaceMode; 2] = [InterfaceMode::Tunnel, InterfaceMode::Tap];

fn every_flag_set() -> impl Iterator<Item = InterfaceFlags> {
    (0..=InterfaceFlags::all().bits()).filter_map(InterfaceFlags::from_bits)
}

fn resolve_is_pure<P: Platform>() {
    for mode in MODES.iter().copied() {
        for flags in every_flag_set() {
            assert_eq!(P::resolve(mode, flags), P::resolve(mode, flags),
                "{} {:?} {:?}", P::NAME, mode, flags);
        }
    }
}

#[test]
fn deterministic() {
    resolve_is_pure::<Linux>();
    resolve_is_pure::<FreeBsd>();
    resolve_is_pure::<NetBsd>();
    resolve_is_pure::<OpenBsd>();
    resolve_is_pure::<Darwin>();
}

#[test]
fn linux_flag_bits() {
    let tun = Linux::resolve(InterfaceMode::Tunnel, InterfaceFlags::empty());
    assert_eq!(tun.bits(), 0x0001);

    let tap = Linux::resolve(InterfaceMode::Tap, InterfaceFlags::empty());
    assert_eq!(tap.bits(), 0x0002);

    let tun_no_pi = Linux::resolve(InterfaceMode::Tunnel, InterfaceFlags::STRIP_PACKET_INFO);
    assert_eq!(tun_no_pi.bits(), 0x1001);

    let all = Linux::resolve(InterfaceMode::Tap, InterfaceFlags::all());
    assert_eq!(all.bits(), 0x9002);
}

#[test]
fn linux_flags_fit_ifreq_short() {
    for mode in MODES.iter().copied() {
        for flags in every_flag_set() {
            let bits = Linux::resolve(mode, flags).bits();
            assert!(bits <= u32::from(u16::MAX), "{:#x}", bits);
        }
    }
}

#[test]
fn linux_tunsetiff() {
    assert_eq!(LinuxIoc::GENERIC.iow(b'T', 202, 4), 0x4004_54ca);
    assert_eq!(LinuxIoc::ALTERNATE.iow(b'T', 202, 4), 0x8004_54ca);
    assert_eq!(Linux::control_command(), ControlCommand::SetInterface(LinuxIoc::TARGET.iow(b'T', 202, 4)));
}

#[test]
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
fn linux_tunsetiff_matches_libc() {
    assert_eq!(Linux::TUNSETIFF, libc::TUNSETIFF as u64);
}

#[test]
fn bsd_tunsifhead() {
    assert_eq!(FreeBsd::control_command(), ControlCommand::SetHeader(0x8004_7460));
    assert_eq!(NetBsd::control_command(), ControlCommand::SetHeader(0x8004_7442));
    assert_eq!(OpenBsd::control_command(), ControlCommand::Implied);
    assert_eq!(Darwin::control_command(), ControlCommand::Implied);
}

#[test]
fn bsd_header_word() {
    assert_eq!(FreeBsd::resolve(InterfaceMode::Tunnel, InterfaceFlags::empty()).bits(), 1);
    assert_eq!(FreeBsd::resolve(InterfaceMode::Tunnel, InterfaceFlags::STRIP_PACKET_INFO).bits(), 0);
    // The node implies the mode, tap has no header to keep.
    assert_eq!(NetBsd::resolve(InterfaceMode::Tap, InterfaceFlags::empty()).bits(), 0);
    // Exclusivity is implied by opening a unit node.
    assert_eq!(OpenBsd::resolve(InterfaceMode::Tunnel, InterfaceFlags::EXCLUSIVE).bits(), 1);
}

#[test]
fn nodes() {
    assert_eq!(Linux::device_node(InterfaceMode::Tap), DeviceNode::Clone("/dev/net/tun"));

    let node = FreeBsd::device_node(InterfaceMode::Tap);
    assert_eq!(node.unit_path(3).as_deref(), Some("/dev/tap3"));
    let node = OpenBsd::device_node(InterfaceMode::Tunnel);
    assert_eq!(node.unit_path(0).as_deref(), Some("/dev/tun0"));

    assert_eq!(Linux::device_node(InterfaceMode::Tunnel).unit_path(0), None);
    assert!(matches!(Darwin::device_node(InterfaceMode::Tunnel), DeviceNode::ControlSocket { .. }));
}

#[test]
fn units_from_names() {
    let node = FreeBsd::device_node(InterfaceMode::Tunnel);
    assert_eq!(node.unit_of("tun7"), Some(7));
    assert_eq!(node.unit_of("tap7"), None);
    assert_eq!(node.unit_of("tun"), None);
    assert_eq!(node.unit_of("tun+1"), None);

    let node = Darwin::device_node(InterfaceMode::Tunnel);
    assert_eq!(node.unit_of("utun12"), Some(12));
    assert_eq!(node.unit_of("tun12"), None);

    assert_eq!(Linux::device_node(InterfaceMode::Tunnel).unit_of("tun0"), None);
}

#[test]
fn header_policies() {
    assert_eq!(Linux::header_policy(InterfaceMode::Tap), HeaderPolicy::Kernel);
    assert_eq!(FreeBsd::header_policy(InterfaceMode::Tunnel), HeaderPolicy::Kernel);
    assert_eq!(FreeBsd::header_policy(InterfaceMode::Tap), HeaderPolicy::Never);
    assert_eq!(OpenBsd::header_policy(InterfaceMode::Tunnel), HeaderPolicy::Always);
    assert_eq!(Darwin::header_policy(InterfaceMode::Tunnel), HeaderPolicy::Always);
}

#[test]
fn darwin_has_no_tap() {
    assert!(Darwin::supports(InterfaceMode::Tunnel));
    assert!(!Darwin::supports(InterfaceMode::Tap));
    assert!(Linux::supports(InterfaceMode::Tap));
}

#[test]
fn name_limits() {
    assert_eq!(Linux::NAME_LIMIT, 16);
    assert_eq!(FreeBsd::NAME_LIMIT, 16);
    assert_eq!(Darwin::NAME_LIMIT, 16);
}

#[test]
#[cfg(target_os = "linux")]
fn host_families_match_libc() {
    let families = Host::address_families();
    assert_eq!(families.inet, libc::AF_INET as u32);
    assert_eq!(families.inet6, libc::AF_INET6 as u32);
    assert_eq!(Host::NAME_LIMIT, libc::IF_NAMESIZE);
}
