//! Domain classes and wrappers shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context as LayerContext, Layer, SubscriberExt};
use vitrine_registry::model;

use crate::{Decorator, DecoratorRegistry, RegistryBuilder, RegistryConfig};

#[derive(Debug)]
pub struct Widget {
	pub name: &'static str,
}

model!(Widget);

/// Shares nothing with `Widget` but a name prefix; never inherits its registration.
#[derive(Debug)]
pub struct SpecialWidget;

model!(SpecialWidget);

#[derive(Debug)]
pub struct Gadget;

model!(Gadget);

#[derive(Debug)]
pub struct Account {
	pub login: &'static str,
}

model!(Account, persisted: true);

#[derive(Debug)]
pub struct LegacyAccount;

model!(LegacyAccount, persisted: true);

#[derive(Debug)]
pub struct Invoice;

model!(Invoice, model_type: "billing/invoice", persisted: true);

/// Registered nowhere.
#[derive(Debug)]
pub struct Orphan;

model!(Orphan);

crate::decorator_type!(WidgetView, { wraps: Widget, model_type: "widget" });
crate::collection_type!(WidgetListView of WidgetView);

crate::decorator_type!(GadgetView, { wraps: Gadget, aliases: [Widget] });
crate::collection_type!(GadgetListView of GadgetView);

crate::decorator_type!(RivalWidgetView, { wraps: Widget, model_type: "widget" });

crate::decorator_type!(AccountView, { wraps: Account, aliases: [LegacyAccount] });
crate::collection_type!(AccountListView of AccountView);

crate::decorator_type!(InvoiceView, { wraps: Invoice });

crate::shared! {
	for WidgetView;

	pub trait WidgetBehavior {
		fn heading(&self) -> String {
			format!("{} widget(s) for {}", self.objects().len(), self.action())
		}
	}

	pub trait WidgetClassBehavior {
		const ICON: &'static str = "cube";

		fn label() -> &'static str {
			"Widgets"
		}
	}
}

/// Widget, gadget, account and invoice wrappers, with widget's shared behavior installed
/// before its collection is declared.
pub fn builder() -> RegistryBuilder {
	let mut builder = RegistryBuilder::new(RegistryConfig::default());
	builder.install_shared::<WidgetView>();
	builder.declare::<WidgetView>().unwrap();
	builder.declare_collection::<WidgetListView>().unwrap();
	builder.declare::<GadgetView>().unwrap();
	builder.declare_collection::<GadgetListView>().unwrap();
	builder.declare::<AccountView>().unwrap();
	builder.declare_collection::<AccountListView>().unwrap();
	builder.declare::<InvoiceView>().unwrap();
	builder
}

pub fn registry() -> DecoratorRegistry {
	builder().build()
}

pub fn names(decorators: &[Box<dyn Decorator>]) -> Vec<&'static str> {
	decorators.iter().map(|d| d.wrapper().name()).collect()
}

#[derive(Clone, Default)]
pub struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
	pub fn count(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}
}

impl<S: Subscriber> Layer<S> for WarnCounter {
	fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
		if *event.metadata().level() == Level::WARN {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}
}

/// Runs `f` and returns its result with the number of warnings it emitted.
pub fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
	let counter = WarnCounter::default();
	let subscriber = tracing_subscriber::registry().with(counter.clone());
	let out = tracing::subscriber::with_default(subscriber, f);
	(out, counter.count())
}
