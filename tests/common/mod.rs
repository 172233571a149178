//! A hand-written equivalent of a generated `ICalculator` proxy, shared by the integration
//! tests.

#![allow(dead_code)]

use std::sync::{Arc, Weak};

use stunts::{
    invocation::{Invocation, MethodInfo, Parameter, Return},
    mock::{MockCell, MockConfig, MockState},
    naming::{ContractSet, Naming},
    pipeline::BehaviorPipeline,
    proxy::{Mocked, Proxy, Target},
    value::{ArgType, Handler, TypeDesc, Value},
    Error, Result,
};

/// Member identities of `ICalculator`.
pub mod members {
    use super::*;

    pub fn add() -> Arc<MethodInfo> {
        Arc::new(MethodInfo::method(
            "ICalculator",
            "Add",
            vec![
                Parameter::new("x", TypeDesc::I32),
                Parameter::new("y", TypeDesc::I32),
            ],
            TypeDesc::I32,
        ))
    }

    pub fn answer() -> Arc<MethodInfo> {
        Arc::new(MethodInfo::method("ICalculator", "Answer", vec![], TypeDesc::I32))
    }

    pub fn try_parse() -> Arc<MethodInfo> {
        Arc::new(MethodInfo::method(
            "ICalculator",
            "TryParse",
            vec![
                Parameter::new("input", TypeDesc::String),
                Parameter::out("result", TypeDesc::I32),
            ],
            TypeDesc::Bool,
        ))
    }

    pub fn history() -> Arc<MethodInfo> {
        Arc::new(MethodInfo::method(
            "ICalculator",
            "History",
            vec![],
            TypeDesc::array(TypeDesc::I32),
        ))
    }

    pub fn memory() -> Arc<MethodInfo> {
        Arc::new(MethodInfo::property_get(
            "ICalculator",
            "Memory",
            TypeDesc::nullable(TypeDesc::I32),
        ))
    }

    pub fn add_async() -> Arc<MethodInfo> {
        Arc::new(MethodInfo::method(
            "ICalculator",
            "AddAsync",
            vec![
                Parameter::new("x", TypeDesc::I32),
                Parameter::new("y", TypeDesc::I32),
            ],
            TypeDesc::task(Some(TypeDesc::I32)),
        ))
    }

    pub fn equals() -> Arc<MethodInfo> {
        Arc::new(MethodInfo::method(
            "object",
            "Equals",
            vec![Parameter::new("obj", TypeDesc::Object)],
            TypeDesc::Bool,
        ))
    }

    pub fn changed_add() -> Arc<MethodInfo> {
        Arc::new(MethodInfo::event_add(
            "ICalculator",
            "Changed",
            TypeDesc::delegate("EventHandler"),
        ))
    }

    pub fn changed_remove() -> Arc<MethodInfo> {
        Arc::new(MethodInfo::event_remove(
            "ICalculator",
            "Changed",
            TypeDesc::delegate("EventHandler"),
        ))
    }
}

pub struct Calculator {
    this: Weak<Calculator>,
    pipeline: Arc<BehaviorPipeline>,
    mock: Option<(MockCell, MockConfig)>,
    type_name: String,
}

impl Calculator {
    fn create(mock: Option<MockConfig>) -> Arc<Self> {
        let naming = if mock.is_some() {
            Naming::MOCKS
        } else {
            Naming::STUNTS
        };
        Arc::new_cyclic(|this| Calculator {
            this: this.clone(),
            pipeline: Arc::new(BehaviorPipeline::new()),
            type_name: naming.full_name(&ContractSet::new(None, ["Acme.ICalculator"])),
            mock: mock.map(|config| (MockCell::new(), config)),
        })
    }

    pub fn stunt() -> Arc<Self> {
        Self::create(None)
    }

    pub fn mock() -> Arc<Self> {
        Self::mock_with(MockConfig::default())
    }

    pub fn mock_with(config: MockConfig) -> Arc<Self> {
        let calculator = Self::create(Some(config));
        Mocked::mock(&*calculator).expect("mock state attaches to a fresh pipeline");
        calculator
    }

    pub fn target(&self) -> Target {
        Target::from_weak(self.this.clone())
    }

    pub fn state(&self) -> &MockState {
        Mocked::mock(self).expect("calculator is a mock")
    }

    pub fn call(&self, method: Arc<MethodInfo>, arguments: Vec<Value>) -> Result<Return> {
        let invocation = Invocation::new(self.target(), method, arguments)?;
        self.pipeline.invoke_or_raise(&invocation, |invocation| {
            Err(Error::Error(format!(
                "{} has no implementation",
                invocation.method()
            )))
        })
    }

    pub fn add(&self, x: i32, y: i32) -> Result<i32> {
        let ret = self.call(members::add(), vec![x.into_value(), y.into_value()])?;
        Ok(ret.value().and_then(i32::from_value).unwrap_or_default())
    }

    pub fn answer(&self) -> Result<i32> {
        let ret = self.call(members::answer(), vec![])?;
        Ok(ret.value().and_then(i32::from_value).unwrap_or_default())
    }

    pub fn try_parse(&self, input: &str) -> Result<(bool, i32)> {
        let ret = self.call(
            members::try_parse(),
            vec![input.into(), i32::placeholder().into_value()],
        )?;
        let parsed = ret.value().and_then(bool::from_value).unwrap_or_default();
        let result = ret
            .outputs()
            .get_by_name("result")
            .and_then(i32::from_value)
            .unwrap_or_default();
        Ok((parsed, result))
    }

    pub fn history(&self) -> Result<Value> {
        let ret = self.call(members::history(), vec![])?;
        Ok(ret.value().cloned().unwrap_or(Value::Null))
    }

    pub fn memory(&self) -> Result<Option<i32>> {
        let ret = self.call(members::memory(), vec![])?;
        Ok(ret
            .value()
            .and_then(<Option<i32>>::from_value)
            .unwrap_or_default())
    }

    pub fn add_async(&self, x: i32, y: i32) -> Result<Value> {
        let ret = self.call(members::add_async(), vec![x.into_value(), y.into_value()])?;
        Ok(ret.value().cloned().unwrap_or(Value::Null))
    }

    pub fn equals(&self, other: Value) -> Result<bool> {
        let ret = self.call(members::equals(), vec![other])?;
        Ok(ret.value().and_then(bool::from_value).unwrap_or_default())
    }

    pub fn add_changed(&self, handler: Handler) -> Result<()> {
        self.call(members::changed_add(), vec![handler.into()])
            .map(|_| ())
    }

    pub fn remove_changed(&self, handler: Handler) -> Result<()> {
        self.call(members::changed_remove(), vec![handler.into()])
            .map(|_| ())
    }
}

impl Proxy for Calculator {
    fn pipeline(&self) -> &BehaviorPipeline {
        &self.pipeline
    }

    fn as_mocked(&self) -> Option<&dyn Mocked> {
        self.mock.as_ref().map(|_| self as &dyn Mocked)
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl Mocked for Calculator {
    fn mock(&self) -> Result<&MockState> {
        let (cell, config) = self
            .mock
            .as_ref()
            .ok_or_else(|| Error::NotMocked(self.type_name.clone()))?;
        cell.get_or_init(&self.pipeline, config.clone())
    }
}
