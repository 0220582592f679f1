//! Chained dispatcher (C3): the most intricate of the four. Builds a
//! root-to-endpoint resolution for every `Chained` action at freeze time, then
//! matches a request by walking each candidate chain's structural segments
//! (literal `PathPart`s and `CaptureArgs` wildcards) followed by the
//! endpoint's own `Args` arity against whatever trails.
//!
//! This is functionally equivalent to descending a shared prefix trie —
//! precomputing one flattened chain per endpoint instead of a literal tree
//! is simpler to reason about and just as correct for a table that's built
//! once and frozen for the process lifetime.

use crate::action::{Action, ActionRegistry, ArgCount};
use crate::context::{ChainLink, DispatchResult};
use crate::dispatch::DispatchType;

/// One structural hop between the chain's root and its endpoint: an
/// optional literal segment to match, followed by a fixed number of
/// captured segments.
struct ChainHop {
    private_name: String,
    path_part: Option<String>,
    capture_count: usize,
}

struct ResolvedChain {
    hops: Vec<ChainHop>,
    endpoint_private_name: String,
    endpoint_path_part: Option<String>,
    endpoint_args: ArgCount,
    order: usize,
}

#[derive(Default)]
pub struct ChainedDispatcher {
    chains: Vec<ResolvedChain>,
}

impl ChainedDispatcher {
    fn chain_for(&self, endpoint_private_name: &str) -> Option<&ResolvedChain> {
        self.chains
            .iter()
            .find(|c| c.endpoint_private_name == endpoint_private_name)
    }
}

impl ChainedDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve_chain<T>(registry: &ActionRegistry<T>, endpoint: &Action<T>) -> Option<Vec<ChainHop>> {
        let mut hops = Vec::new();
        let mut parent_ref = endpoint.chained_parent();

        while let Some(parent_name) = parent_ref {
            if parent_name.is_empty() || parent_name == "/" {
                break;
            }
            let Some(parent) = registry.get(parent_name) else {
                tracing::warn!(
                    endpoint = %endpoint.private_name,
                    missing_parent = %parent_name,
                    "Chained link with missing parent, chain dropped"
                );
                return None;
            };
            hops.push(ChainHop {
                private_name: parent.private_name.clone(),
                path_part: parent.path_part().map(str::to_string),
                capture_count: parent.capture_args.unwrap_or(0),
            });
            parent_ref = parent.chained_parent();
        }

        hops.reverse();
        Some(hops)
    }
}

impl<T> DispatchType<T> for ChainedDispatcher {
    fn freeze(&mut self, registry: &ActionRegistry<T>) {
        self.chains.clear();

        for (order, action) in registry.iter().enumerate() {
            if action.is_private() || !action.valid {
                continue;
            }
            if !action.attributes.has("Chained") {
                continue;
            }
            let Some(args) = action.args else {
                continue;
            };
            let Some(hops) = Self::resolve_chain(registry, action) else {
                continue;
            };

            self.chains.push(ResolvedChain {
                hops,
                endpoint_private_name: action.private_name.clone(),
                endpoint_path_part: action.path_part().map(str::to_string),
                endpoint_args: args,
                order,
            });
        }
    }

    fn try_match(&self, _registry: &ActionRegistry<T>, segments: &[String]) -> Option<DispatchResult> {
        let mut best: Option<(&ResolvedChain, usize, Vec<String>)> = None;

        'chains: for chain in &self.chains {
            let mut index = 0usize;
            // Captures per hop, in chain order, so each midpoint link is
            // invoked with only the segments *it* consumed (§4.3 step 4),
            // not the concatenation of every link's captures.
            let mut hop_captures: Vec<Vec<String>> = Vec::with_capacity(chain.hops.len());

            for hop in &chain.hops {
                if let Some(part) = &hop.path_part {
                    if segments.get(index).map(String::as_str) != Some(part.as_str()) {
                        continue 'chains;
                    }
                    index += 1;
                }
                if index + hop.capture_count > segments.len() {
                    continue 'chains;
                }
                hop_captures.push(segments[index..index + hop.capture_count].to_vec());
                index += hop.capture_count;
            }

            if let Some(part) = &chain.endpoint_path_part {
                if segments.get(index).map(String::as_str) != Some(part.as_str()) {
                    continue 'chains;
                }
                index += 1;
            }

            let residual = segments.len() - index;
            if !chain.endpoint_args.accepts(residual) {
                continue 'chains;
            }

            let is_better = match &best {
                None => true,
                Some((current, current_index, _)) => {
                    let chain_fixed = matches!(chain.endpoint_args, ArgCount::Fixed(_));
                    let current_fixed = matches!(current.endpoint_args, ArgCount::Fixed(_));
                    if chain_fixed != current_fixed {
                        chain_fixed
                    } else if index != *current_index {
                        index > *current_index
                    } else {
                        chain.order < current.order
                    }
                }
            };
            if is_better {
                best = Some((chain, index, hop_captures));
            }
        }

        best.map(|(chain, index, hop_captures)| {
            let mut links: Vec<ChainLink> = chain
                .hops
                .iter()
                .zip(hop_captures.into_iter())
                .map(|(hop, captures)| ChainLink {
                    private_name: hop.private_name.clone(),
                    captures,
                })
                .collect();
            links.push(ChainLink {
                private_name: chain.endpoint_private_name.clone(),
                captures: Vec::new(),
            });

            DispatchResult {
                chain: links,
                match_string: segments[..index].join("/"),
                args: segments[index..].to_vec(),
            }
        })
    }

    fn is_low_precedence(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "Chained"
    }

    fn claims(&self, action: &Action<T>) -> bool {
        self.chain_for(&action.private_name).is_some()
    }

    fn uri_for(
        &self,
        _registry: &ActionRegistry<T>,
        private_name: &str,
        captures: &[String],
        args: &[String],
    ) -> Option<String> {
        let chain = self.chain_for(private_name)?;
        if !chain.endpoint_args.accepts(args.len()) {
            return None;
        }

        let mut remaining = captures;
        let mut parts: Vec<String> = Vec::new();

        for hop in &chain.hops {
            if let Some(part) = &hop.path_part {
                parts.push(part.clone());
            }
            if remaining.len() < hop.capture_count {
                return None;
            }
            let (consumed, rest) = remaining.split_at(hop.capture_count);
            parts.extend(consumed.iter().cloned());
            remaining = rest;
        }

        if !remaining.is_empty() {
            return None;
        }

        if let Some(part) = &chain.endpoint_path_part {
            parts.push(part.clone());
        }
        parts.extend(args.iter().cloned());

        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionDef, AttributeMap};
    use std::sync::Arc;

    fn noop() -> crate::action::ActionFn<()> {
        Arc::new(|_s, ctx| Box::pin(async move { (ctx, true) }))
    }

    /// Builds the three-level chain from Property P3: a root hop
    /// (`PathPart="chain"`), a capturing midpoint (`PathPart="midle"`,
    /// `CaptureArgs=2`), and a variadic endpoint (`PathPart="end"`).
    fn root_midpoint_and_endpoint() -> ActionRegistry<()> {
        let mut root_attrs = AttributeMap::new();
        root_attrs.insert("Chained", "/");
        root_attrs.insert("PathPart", "chain");

        let mut midpoint_attrs = AttributeMap::new();
        midpoint_attrs.insert("Chained", "chain/root");
        midpoint_attrs.insert("PathPart", "midle");
        midpoint_attrs.insert("CaptureArgs", "2");

        let mut endpoint_attrs = AttributeMap::new();
        endpoint_attrs.insert("Chained", "chain/midle");
        endpoint_attrs.insert("PathPart", "end");

        ActionRegistry::build(vec![
            (
                "chain".to_string(),
                ActionDef {
                    name: "root".into(),
                    attributes: root_attrs,
                    args: None,
                    capture_args: Some(0),
                    valid: true,
                    handler: noop(),
                },
            ),
            (
                "chain".to_string(),
                ActionDef {
                    name: "midle".into(),
                    attributes: midpoint_attrs,
                    args: None,
                    capture_args: Some(2),
                    valid: true,
                    handler: noop(),
                },
            ),
            (
                "chain/midle".to_string(),
                ActionDef {
                    name: "end".into(),
                    attributes: endpoint_attrs,
                    args: Some(ArgCount::Variadic),
                    capture_args: None,
                    valid: true,
                    handler: noop(),
                },
            ),
        ])
    }

    #[test]
    fn full_chain_matches_with_captures_and_variadic_args() {
        let registry = root_midpoint_and_endpoint();
        let mut dispatcher = ChainedDispatcher::new();
        DispatchType::<()>::freeze(&mut dispatcher, &registry);

        let segments = crate::dispatch::split_path("/chain/midle/TWO/ONE/end/1/2/3/4/5");
        let result = DispatchType::<()>::try_match(&dispatcher, &registry, &segments).unwrap();

        assert_eq!(result.args, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(result.chain.len(), 3);
        assert_eq!(result.chain[0].private_name, "chain/root");
        assert!(result.chain[0].captures.is_empty());
        assert_eq!(result.chain[1].private_name, "chain/midle");
        assert_eq!(result.chain[1].captures, vec!["TWO", "ONE"]);
        assert_eq!(result.chain[2].private_name, "chain/midle/end");
        assert!(result.chain[2].captures.is_empty());
    }

    #[test]
    fn missing_captures_does_not_match() {
        let registry = root_midpoint_and_endpoint();
        let mut dispatcher = ChainedDispatcher::new();
        DispatchType::<()>::freeze(&mut dispatcher, &registry);

        let segments = crate::dispatch::split_path("/chain/midle/end/1");
        assert!(DispatchType::<()>::try_match(&dispatcher, &registry, &segments).is_none());
    }
}
