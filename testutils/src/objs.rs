use dt_core::k8s::ResourceRecord;
use serde_json::json;

pub fn ready_record(namespace: &str, name: &str) -> ResourceRecord {
    ResourceRecord::new(namespace, name, 1, 1)
}

pub fn unready_record(namespace: &str, name: &str) -> ResourceRecord {
    ResourceRecord::new(namespace, name, 0, 1)
}

pub fn malformed_record(namespace: &str, name: &str) -> ResourceRecord {
    ResourceRecord { ready_count: None, ..ready_record(namespace, name) }
}

// Raw apiserver objects, for exercising the kube-backed lister; `None` leaves the replica field
// out of the object entirely, like the apiserver does for zero-valued status fields.
pub fn workload_obj(
    api_version: &str,
    kind: &str,
    namespace: &str,
    name: &str,
    desired: Option<serde_json::Value>,
    ready: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut obj = json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": {"name": name, "namespace": namespace},
        "spec": {},
        "status": {},
    });
    if let Some(d) = desired {
        obj["spec"]["replicas"] = d;
    }
    if let Some(r) = ready {
        obj["status"]["readyReplicas"] = r;
    }
    obj
}

pub fn namespace_obj(name: &str) -> serde_json::Value {
    json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {"name": name},
    })
}

pub fn object_list(api_version: &str, kind: &str, items: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "apiVersion": api_version,
        "kind": format!("{kind}List"),
        "metadata": {"resourceVersion": "1"},
        "items": items,
    })
}
