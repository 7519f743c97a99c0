use std::time::Duration;

use bytes::Bytes;
use tokio::{sync::mpsc, time::timeout};
use tokio_util::sync::CancellationToken;

use lsnet_common::Link;
use lsnet_node::{FlowKey, Host, Router, RouterTables};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn host_to_host_through_one_router() {
    let _ = tracing_subscriber::fmt::try_init();

    let (h1, h1_wire) = Host::new("1");
    let (h2, h2_wire) = Host::new("2");

    let mut tables = RouterTables::default();
    tables.encap.insert(FlowKey::new("1", "2", 0), 7);
    tables.fwd.insert(7, 1);
    tables.decap.insert(1, 0);
    let (router, mut wires) = Router::new("r1", &[500, 500], tables, 8);
    let stats = router.stats();

    let cancel = CancellationToken::new();
    tokio::spawn(Link::new(h1_wire, wires.remove(0)).run(cancel.clone()));
    tokio::spawn(Link::new(wires.remove(0), h2_wire).run(cancel.clone()));
    let router_task = tokio::spawn(router.run(cancel.clone()));

    let (delivery_tx, mut delivery) = mpsc::channel(16);
    let h2_task = tokio::spawn(h2.run(cancel.clone(), delivery_tx));

    for payload in [&b"first"[..], b"second", b"third"] {
        h1.send("2", Bytes::copy_from_slice(payload), 0).unwrap();
    }

    // FIFO end to end: frames arrive in send order
    for expected in [&b"first"[..], b"second", b"third"] {
        let pkt = timeout(RECV_TIMEOUT, delivery.recv()).await.unwrap().unwrap();
        assert_eq!(pkt.payload(), &Bytes::copy_from_slice(expected));
        assert_eq!(pkt.src(), "1");
        assert_eq!(pkt.dst(), "2");
    }

    assert_eq!(stats.forwarded(), 3);
    assert_eq!(stats.dropped_full(), 0);
    assert_eq!(stats.dropped_lookup(), 0);

    cancel.cancel();
    router_task.await.unwrap().unwrap();
    h2_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn label_switched_path_across_two_routers() {
    let _ = tracing_subscriber::fmt::try_init();

    let (h1, h1_wire) = Host::new("1");
    let (h2, h2_wire) = Host::new("2");

    // r1 is the ingress LSR: it labels the flow and keeps the frame
    // label-switched toward r2.
    let mut t1 = RouterTables::default();
    t1.encap.insert(FlowKey::new("1", "2", 0), 7);
    t1.fwd.insert(7, 1);
    t1.decap.insert(1, 1);
    let (r1, mut r1_wires) = Router::new("r1", &[500, 500], t1, 8);

    // r2 is the egress LSR: it strips the label before the host.
    let mut t2 = RouterTables::default();
    t2.fwd.insert(7, 1);
    t2.decap.insert(1, 0);
    let (r2, mut r2_wires) = Router::new("r2", &[500, 500], t2, 8);

    let cancel = CancellationToken::new();
    tokio::spawn(Link::new(h1_wire, r1_wires.remove(0)).run(cancel.clone()));
    tokio::spawn(Link::new(r1_wires.remove(0), r2_wires.remove(0)).run(cancel.clone()));
    tokio::spawn(Link::new(r2_wires.remove(0), h2_wire).run(cancel.clone()));
    let r1_task = tokio::spawn(r1.run(cancel.clone()));
    let r2_task = tokio::spawn(r2.run(cancel.clone()));

    let (delivery_tx, mut delivery) = mpsc::channel(16);
    let h2_task = tokio::spawn(h2.run(cancel.clone(), delivery_tx));

    h1.send("2", Bytes::from_static(b"labeled hop"), 0).unwrap();

    let pkt = timeout(RECV_TIMEOUT, delivery.recv()).await.unwrap().unwrap();
    assert_eq!(pkt.payload(), &Bytes::from_static(b"labeled hop"));
    assert_eq!(pkt.src(), "1");
    // the labeled hop does not carry priority on the wire
    assert_eq!(pkt.priority(), 0);

    cancel.cancel();
    r1_task.await.unwrap().unwrap();
    r2_task.await.unwrap().unwrap();
    h2_task.await.unwrap().unwrap();
}
