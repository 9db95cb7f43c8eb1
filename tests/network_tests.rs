use audioviz_web::core::network::{
    ArcMidpoint, NetworkConfig, NetworkFrame, NetworkTopology, NodeMotion, QuadraticBezier,
};
use glam::Vec3;

#[test]
fn bezier_samples_include_both_endpoints() {
    let curve = QuadraticBezier {
        start: Vec3::ZERO,
        control: Vec3::new(1.0, 2.0, 0.0),
        end: Vec3::new(2.0, 0.0, 0.0),
    };
    let pts = curve.points(50);
    assert_eq!(pts.len(), 51);
    assert_eq!(pts[0], curve.start);
    assert_eq!(pts[50], curve.end);
    assert!((curve.point_at(0.5) - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
}

#[test]
fn topology_is_deterministic_for_a_seed() {
    let a = NetworkTopology::new(NetworkConfig::default());
    let b = NetworkTopology::new(NetworkConfig::default());
    assert_eq!(a.nodes(), b.nodes());
    assert_eq!(a.connections(), b.connections());
    assert_eq!(a.nodes().len(), 100);
    assert_eq!(a.connections().len(), 150);
    assert!(a.polylines().iter().all(|p| p.len() == 51));

    let other = NetworkTopology::new(NetworkConfig {
        seed: 99,
        ..NetworkConfig::default()
    });
    assert_ne!(a.nodes(), other.nodes());
}

#[test]
fn nodes_stay_inside_the_extent() {
    let net = NetworkTopology::new(NetworkConfig::default());
    assert!(net
        .nodes()
        .iter()
        .all(|n| n.abs().max_element() <= 3.0 + 1e-6));
}

#[test]
fn lifted_arcs_rise_above_the_chord() {
    let net = NetworkTopology::new(NetworkConfig::default());
    for c in net.curves() {
        let mid = c.start.lerp(c.end, 0.5);
        let lift = c.start.distance(c.end) * 0.1;
        assert!((c.control.y - mid.y - lift).abs() < 1e-4);
    }
}

#[test]
fn packets_follow_the_flow_period() {
    let net = NetworkTopology::new(NetworkConfig::default());
    let mut frame = NetworkFrame::default();
    net.frame_into(0.5, &mut frame);
    assert_eq!(frame.packets.len(), 150);
    assert_eq!(frame.packets[0], net.curves()[0].point_at(0.25));
    assert_eq!(frame.dash_offset, 0.0);

    // one full period later the packets are back where they were
    let first = frame.packets.clone();
    net.frame_into(2.5, &mut frame);
    for (a, b) in first.iter().zip(&frame.packets) {
        assert!((*a - *b).length() < 1e-4);
    }
}

#[test]
fn pulsing_dashed_network() {
    let net = NetworkTopology::new(NetworkConfig {
        node_count: 10,
        connection_count: 5,
        midpoint: ArcMidpoint::Jittered { amount: 0.5 },
        motion: NodeMotion::Pulse,
        line_wobble: 0.0,
        data_flow: false,
        dashed: true,
        ..NetworkConfig::default()
    });
    let mut frame = NetworkFrame::default();
    net.frame_into(1.0, &mut frame);
    assert!(frame.packets.is_empty());
    assert_eq!(frame.node_positions, net.nodes());
    assert_eq!(frame.lines.as_slice(), net.polylines());
    assert!(frame.node_scales.iter().all(|s| (0.9..=1.1).contains(s)));
    let expected = ((2.0f32).sin() + 1.0) / 2.0 * 10.0;
    assert!((frame.dash_offset - expected).abs() < 1e-5);
}

#[test]
fn empty_network_is_fine() {
    let net = NetworkTopology::new(NetworkConfig {
        node_count: 0,
        ..NetworkConfig::default()
    });
    assert!(net.connections().is_empty());
    let mut frame = NetworkFrame::default();
    net.frame_into(1.0, &mut frame);
    assert!(frame.lines.is_empty());
    assert!(frame.packets.is_empty());
}
