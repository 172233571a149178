#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use stunts::{
    invocation::{Invocation, MethodInfo, Parameter},
    matcher::{capture, Matcher},
    pipeline::BehaviorPipeline,
    proxy::{Proxy, Target},
    value::{TypeDesc, Value},
};

struct Stunt(BehaviorPipeline);

impl Proxy for Stunt {
    fn pipeline(&self) -> &BehaviorPipeline {
        &self.0
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&queued, data)) = data.split_first() else {
        return;
    };

    let values: Vec<Value> = data
        .chunks_exact(4)
        .take(8)
        .map(|chunk| Value::I32(i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])))
        .collect();
    let parameters = (0..values.len())
        .map(|i| Parameter::new(format!("p{i}"), TypeDesc::I32))
        .collect();
    let method = MethodInfo::method("IFuzz", "Call", parameters, TypeDesc::Void);

    let stunt = Arc::new(Stunt(BehaviorPipeline::new()));
    let Ok(invocation) = Invocation::new(Target::new(&stunt), method, values) else {
        return;
    };

    capture::sync_scope(|| {
        for _ in 0..queued % 8 {
            capture::push(Matcher::any(TypeDesc::I32));
        }
        let setup = capture::freeze(&invocation).expect("freeze of a well-formed call");
        assert!(setup.applies_to(&invocation));
        assert_eq!(setup.matchers().len(), invocation.arguments().len());
    });
});
