//! Hand-written proxies used across the unit tests.
//!
//! Both fixtures are what a generator would emit for a small contract: a weak self-reference
//! for building targets, an owned pipeline and, for mocks, a lazily created [`MockState`].

use std::sync::{Arc, Weak};

use crate::{
    invocation::{Invocation, MethodInfo, Return},
    mock::{MockCell, MockConfig, MockState},
    naming::{ContractSet, Naming},
    pipeline::BehaviorPipeline,
    proxy::{Mocked, Proxy, Target},
    value::{ArgType, Handler, Value},
    Error, Result,
};

/// Member identities of `ICalculator`.
pub mod calculator {
    use std::sync::Arc;

    use crate::{
        invocation::{MethodInfo, Parameter},
        value::TypeDesc,
    };

    fn binary(name: &str) -> Arc<MethodInfo> {
        Arc::new(MethodInfo::method(
            "ICalculator",
            name,
            vec![
                Parameter::new("x", TypeDesc::I32),
                Parameter::new("y", TypeDesc::I32),
            ],
            TypeDesc::I32,
        ))
    }

    pub fn add() -> Arc<MethodInfo> {
        binary("Add")
    }

    pub fn subtract() -> Arc<MethodInfo> {
        binary("Subtract")
    }
}

/// Member identities of `INotifier`.
pub mod notifier {
    use std::sync::Arc;

    use crate::{invocation::MethodInfo, value::TypeDesc};

    pub fn add(event: &str) -> Arc<MethodInfo> {
        Arc::new(MethodInfo::event_add(
            "INotifier",
            event,
            TypeDesc::delegate("EventHandler"),
        ))
    }

    pub fn remove(event: &str) -> Arc<MethodInfo> {
        Arc::new(MethodInfo::event_remove(
            "INotifier",
            event,
            TypeDesc::delegate("EventHandler"),
        ))
    }
}

fn type_name(contract: &str, mocked: bool) -> String {
    let naming = if mocked { Naming::MOCKS } else { Naming::STUNTS };
    naming.full_name(&ContractSet::new(None, [contract]))
}

fn unimplemented(invocation: &Invocation) -> Result<Return> {
    Err(Error::Error(format!(
        "{} has no implementation",
        invocation.method()
    )))
}

fn dispatch<P: Proxy>(
    proxy: &P,
    this: &Weak<P>,
    method: Arc<MethodInfo>,
    arguments: Vec<Value>,
) -> Result<Return> {
    let invocation = Invocation::new(Target::from_weak(this.clone()), method, arguments)?;
    proxy.pipeline().invoke_or_raise(&invocation, unimplemented)
}

pub struct CalculatorProxy {
    this: Weak<CalculatorProxy>,
    pipeline: Arc<BehaviorPipeline>,
    mock: Option<MockCell>,
    type_name: String,
}

impl CalculatorProxy {
    fn create(mocked: bool) -> Arc<Self> {
        Arc::new_cyclic(|this| CalculatorProxy {
            this: this.clone(),
            pipeline: Arc::new(BehaviorPipeline::new()),
            mock: mocked.then(MockCell::new),
            type_name: type_name("ICalculator", mocked),
        })
    }

    /// A plain proxy with an empty pipeline.
    pub fn stunt() -> Arc<Self> {
        Self::create(false)
    }

    /// A mock whose state is attached eagerly with the default configuration.
    pub fn mock() -> Arc<Self> {
        let proxy = Self::create(true);
        Mocked::mock(&*proxy).unwrap();
        proxy
    }

    pub fn target(&self) -> Target {
        Target::from_weak(self.this.clone())
    }

    pub fn state(&self) -> &MockState {
        Mocked::mock(self).unwrap()
    }

    pub fn add(&self, x: i32, y: i32) -> Result<i32> {
        self.binary(calculator::add(), x, y)
    }

    pub fn subtract(&self, x: i32, y: i32) -> Result<i32> {
        self.binary(calculator::subtract(), x, y)
    }

    fn binary(&self, method: Arc<MethodInfo>, x: i32, y: i32) -> Result<i32> {
        let ret = dispatch(self, &self.this, method, vec![x.into_value(), y.into_value()])?;
        Ok(ret.value().and_then(i32::from_value).unwrap_or_default())
    }
}

impl Proxy for CalculatorProxy {
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

impl Mocked for CalculatorProxy {
    fn mock(&self) -> Result<&MockState> {
        let cell = self
            .mock
            .as_ref()
            .ok_or_else(|| Error::NotMocked(self.type_name.clone()))?;
        cell.get_or_init(&self.pipeline, MockConfig::default())
    }
}

pub struct NotifierProxy {
    this: Weak<NotifierProxy>,
    pipeline: Arc<BehaviorPipeline>,
    mock: Option<MockCell>,
    type_name: String,
}

impl NotifierProxy {
    fn create(mocked: bool) -> Arc<Self> {
        Arc::new_cyclic(|this| NotifierProxy {
            this: this.clone(),
            pipeline: Arc::new(BehaviorPipeline::new()),
            mock: mocked.then(MockCell::new),
            type_name: type_name("INotifier", mocked),
        })
    }

    pub fn stunt() -> Arc<Self> {
        Self::create(false)
    }

    pub fn mock() -> Arc<Self> {
        let proxy = Self::create(true);
        Mocked::mock(&*proxy).unwrap();
        proxy
    }

    pub fn target(&self) -> Target {
        Target::from_weak(self.this.clone())
    }

    pub fn state(&self) -> &MockState {
        Mocked::mock(self).unwrap()
    }

    pub fn add_changed(&self, handler: Handler) -> Result<()> {
        self.accessor(notifier::add("Changed"), handler)
    }

    pub fn remove_changed(&self, handler: Handler) -> Result<()> {
        self.accessor(notifier::remove("Changed"), handler)
    }

    pub fn add_closed(&self, handler: Handler) -> Result<()> {
        self.accessor(notifier::add("Closed"), handler)
    }

    pub fn remove_closed(&self, handler: Handler) -> Result<()> {
        self.accessor(notifier::remove("Closed"), handler)
    }

    fn accessor(&self, method: Arc<MethodInfo>, handler: Handler) -> Result<()> {
        dispatch(self, &self.this, method, vec![Value::Handler(handler)]).map(|_| ())
    }
}

impl Proxy for NotifierProxy {
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

impl Mocked for NotifierProxy {
    fn mock(&self) -> Result<&MockState> {
        let cell = self
            .mock
            .as_ref()
            .ok_or_else(|| Error::NotMocked(self.type_name.clone()))?;
        cell.get_or_init(&self.pipeline, MockConfig::default())
    }
}

#[test]
fn test_fixture_names() {
    assert_eq!(CalculatorProxy::stunt().type_name(), "Stunts.ICalculatorStunt");
    assert_eq!(NotifierProxy::mock().type_name(), "Mocks.INotifierMock");
    assert!(CalculatorProxy::stunt().as_mocked().is_none());
    assert!(Mocked::mock(&*CalculatorProxy::stunt()).is_err());
}
