//! End-to-end routing through config, ring and directory.

use routing::{Dispatcher, RouterConfig, RoutingError};
use std::collections::BTreeMap;

const CONFIG: &str = r#"{
    "ring": { "virtual_nodes": 100 },
    "cells": {
        "cell1": "http://localhost:3000",
        "cell2": "http://localhost:3001",
        "cell3": "http://localhost:3002"
    },
    "path_pattern": "/api/:riderId",
    "routing_attribute": "RIDER_ID",
    "cell_attribute": "CELL_ID"
}"#;

fn notification(rider: &str) -> String {
    format!(
        r#"{{"Message": "Message for {rider}", "MessageAttributes": {{"RIDER_ID": {{"Type": "String", "Value": "{rider}"}}}}}}"#
    )
}

#[test]
fn test_gateway_and_enricher_agree() {
    let dispatcher = Dispatcher::new(RouterConfig::from_json_str(CONFIG).unwrap()).unwrap();

    for i in 0..200 {
        let rider = format!("rider:{:04}", i);
        let by_path = dispatcher
            .route_path(&format!("/api/{}/orders/{}", rider, i))
            .unwrap()
            .unwrap();
        let forward = dispatcher.enrich(&notification(&rider)).unwrap().unwrap();

        assert_eq!(by_path, forward.route);
        assert_eq!(forward.attributes["CELL_ID"].string_value, by_path.cell.as_str());
    }
}

#[test]
fn test_every_cell_receives_traffic() {
    let dispatcher = Dispatcher::new(RouterConfig::from_json_str(CONFIG).unwrap()).unwrap();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for i in 0..3000 {
        let route = dispatcher.route_key(&format!("{}", i)).unwrap().unwrap();
        *counts.entry(route.target).or_default() += 1;
    }
    assert_eq!(counts.len(), 3);
    for (target, count) in counts {
        assert!(count > 600, "{} only received {} requests", target, count);
    }
}

#[test]
fn test_cell_removal_moves_only_its_riders() {
    let dispatcher = Dispatcher::new(RouterConfig::from_json_str(CONFIG).unwrap()).unwrap();
    let riders: Vec<String> = (0..1000).map(|i| format!("rider:{}", i)).collect();
    let before: Vec<_> = riders
        .iter()
        .map(|r| dispatcher.route_key(r).unwrap().unwrap())
        .collect();

    dispatcher.ring().remove_node("cell3").unwrap();

    for (rider, old) in riders.iter().zip(&before) {
        let now = dispatcher.route_key(rider).unwrap().unwrap();
        if old.cell == "cell3" {
            assert_ne!(now.cell, "cell3");
        } else {
            assert_eq!(&now, old);
        }
    }
}

#[test]
fn test_message_without_rider_is_rejected() {
    let dispatcher = Dispatcher::new(RouterConfig::default()).unwrap();
    let body = r#"{"Message": "no rider", "MessageAttributes": {}}"#;
    assert!(matches!(
        dispatcher.enrich(body),
        Err(RoutingError::MissingRoutingKey(_))
    ));
}

#[test]
fn test_invalid_pattern_in_config() {
    let config = RouterConfig::from_json_str(r#"{"path_pattern": "/api/orders"}"#).unwrap();
    assert!(matches!(
        Dispatcher::new(config),
        Err(RoutingError::InvalidPattern { .. })
    ));
}
