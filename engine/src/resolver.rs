//! Topological ordering of a container graph (spec.md §4.1).
//!
//! Edges run `dependency -> dependent`, so a Kahn's-algorithm sort yields an
//! order where every dependency precedes its dependents. Ties between
//! equally-ready nodes are broken lexicographically by name so the order is
//! reproducible across runs, unlike the original Go implementation which
//! left tie-break to whatever its graph library's internal iteration order
//! happened to be.

use std::collections::{BTreeSet, HashMap, VecDeque};

use shared::model::Container;
use shared::Error;

/// Returns container names in an order where every dependency precedes its
/// dependents.
pub fn topological_order(containers: &HashMap<String, Container>) -> Result<Vec<String>, Error> {
    for container in containers.values() {
        for dep in &container.depends_on {
            if !containers.contains_key(dep) {
                return Err(Error::Reference {
                    from: container.name.clone(),
                    to: dep.clone(),
                });
            }
        }
    }

    let mut in_degree: HashMap<&str, usize> = containers
        .keys()
        .map(|name| (name.as_str(), 0usize))
        .collect();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for container in containers.values() {
        for dep in &container.depends_on {
            *in_degree.get_mut(container.name.as_str()).unwrap() += 1;
            dependents
                .entry(dep.as_str())
                .or_default()
                .push(container.name.as_str());
        }
    }

    // BTreeSet gives us a sorted frontier for free, so ties resolve
    // lexicographically without an extra sort step per iteration.
    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(&name, _)| name)
        .collect();

    let mut order = Vec::with_capacity(containers.len());
    let mut queue: VecDeque<&str> = VecDeque::new();

    while !ready.is_empty() || !queue.is_empty() {
        if queue.is_empty() {
            let next = *ready.iter().next().unwrap();
            ready.remove(next);
            queue.push_back(next);
        }
        let name = queue.pop_front().unwrap();
        order.push(name.to_string());

        if let Some(children) = dependents.get(name) {
            let mut newly_ready: Vec<&str> = Vec::new();
            for &child in children {
                let degree = in_degree.get_mut(child).unwrap();
                *degree -= 1;
                if *degree == 0 {
                    newly_ready.push(child);
                }
            }
            newly_ready.sort_unstable();
            for child in newly_ready {
                ready.insert(child);
            }
        }
    }

    if order.len() != containers.len() {
        let members = in_degree
            .into_iter()
            .filter(|(_, degree)| *degree > 0)
            .map(|(name, _)| name.to_string())
            .collect();
        return Err(Error::Cycle { members });
    }

    Ok(order)
}
