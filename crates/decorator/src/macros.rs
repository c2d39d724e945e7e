//! Wrapper declaration macros.

/// Implements the wrapper traits for an item newtype over [`crate::ItemBase`].
#[doc(hidden)]
#[macro_export]
macro_rules! __item_impls {
	($name:ident) => {
		impl $crate::Decorator for $name {
			fn wrapper(&self) -> &$crate::WrapperClass {
				self.0.wrapper()
			}

			fn context(&self) -> &$crate::Context {
				self.0.context()
			}

			fn subject(&self) -> $crate::Subject<'_> {
				$crate::Subject::One(self.0.object())
			}
		}

		impl $crate::Named for $name {
			const NAME: &'static str = stringify!($name);
		}

		impl $crate::Item for $name {
			fn construct(base: $crate::ItemBase) -> Self {
				Self(base)
			}

			fn base(&self) -> &$crate::ItemBase {
				&self.0
			}
		}

		impl $crate::Family for $name {
			type Item = $name;
		}
	};
}

/// Implements the wrapper traits for a collection newtype over [`crate::CollectionBase`].
#[doc(hidden)]
#[macro_export]
macro_rules! __collection_impls {
	($name:ident, $item:ty) => {
		impl $crate::Decorator for $name {
			fn wrapper(&self) -> &$crate::WrapperClass {
				self.0.wrapper()
			}

			fn context(&self) -> &$crate::Context {
				self.0.context()
			}

			fn subject(&self) -> $crate::Subject<'_> {
				$crate::Subject::Many(self.0.objects())
			}
		}

		impl $crate::Named for $name {
			const NAME: &'static str = stringify!($name);
		}

		impl $crate::Collection for $name {
			fn construct(base: $crate::CollectionBase) -> Self {
				Self(base)
			}

			fn base(&self) -> &$crate::CollectionBase {
				&self.0
			}
		}

		impl $crate::Family for $name {
			type Item = $item;
		}
	};
}

/// Defines an item wrapper type without linking it into the global registry.
///
/// Use this for wrappers that are declared on an explicit [`crate::RegistryBuilder`]; use
/// [`crate::decorator!`] to also submit the declaration for [`crate::db::get_db`].
///
/// ```ignore
/// decorator_type!(WidgetView, {
/// 	wraps: Widget,
/// 	model_type: "widget",
/// 	aliases: [LegacyWidget],
/// });
/// ```
#[macro_export]
macro_rules! decorator_type {
	($(#[$attr:meta])* $name:ident, {
		wraps: $primary:ty
		$(, model_type: $model_type:literal)?
		$(, aliases: [$($alias:ty),* $(,)?])?
		$(, force: $force:expr)?
		$(,)?
	}) => {
		$(#[$attr])*
		#[derive(Debug)]
		pub struct $name($crate::ItemBase);

		$crate::__item_impls!($name);

		impl $crate::DeclaredItem for $name {
			fn declaration() -> $crate::ItemDeclaration {
				$crate::ItemDeclaration::of::<$name>($crate::ClassSpec::of::<$primary>())
					$(.model_type($model_type))?
					$($(.alias($crate::ClassSpec::of::<$alias>()))*)?
					$(.force($force))?
			}
		}
	};
}

/// Defines an item wrapper type and links its declaration into the global registry.
#[macro_export]
macro_rules! decorator {
	($(#[$attr:meta])* $name:ident, { $($body:tt)* }) => {
		$crate::decorator_type!($(#[$attr])* $name, { $($body)* });

		$crate::inventory::submit! {
			$crate::WrapperReg::Item(<$name as $crate::DeclaredItem>::declaration)
		}
	};
}

/// Defines a collection wrapper type for an item wrapper, without linking it.
///
/// ```ignore
/// collection_type!(WidgetListView of WidgetView);
/// ```
#[macro_export]
macro_rules! collection_type {
	($(#[$attr:meta])* $name:ident of $item:ty) => {
		$(#[$attr])*
		#[derive(Debug)]
		pub struct $name($crate::CollectionBase);

		$crate::__collection_impls!($name, $item);

		impl $crate::DeclaredCollection for $name {
			fn declaration() -> $crate::CollectionDeclaration {
				$crate::CollectionDeclaration::of::<$name>()
			}
		}
	};
}

/// Defines a collection wrapper type and links its declaration into the global registry.
#[macro_export]
macro_rules! collection_decorator {
	($(#[$attr:meta])* $name:ident of $item:ty) => {
		$crate::collection_type!($(#[$attr])* $name of $item);

		$crate::inventory::submit! {
			$crate::WrapperReg::Collection(<$name as $crate::DeclaredCollection>::declaration)
		}
	};
}

/// Declares the behavior an item wrapper shares with its collection wrapper.
///
/// The instance trait is implemented for every wrapper whose [`crate::Family`] is the item,
/// so its default methods are available on both wrappers. The optional class trait carries
/// associated consts and functions the same way. The item's [`crate::Installer`] record is
/// linked so collection declarations can report what they composed.
///
/// ```ignore
/// shared! {
/// 	for WidgetView;
///
/// 	pub trait WidgetBehavior {
/// 		fn heading(&self) -> String {
/// 			format!("{} widgets", self.objects().len())
/// 		}
/// 	}
///
/// 	pub trait WidgetClassBehavior {
/// 		const ICON: &'static str = "cube";
/// 	}
/// }
/// ```
#[macro_export]
macro_rules! shared {
	(
		for $item:ty;

		$(#[$iattr:meta])*
		$ivis:vis trait $instance:ident { $($ibody:tt)* }

		$(
			$(#[$cattr:meta])*
			$cvis:vis trait $class:ident { $($cbody:tt)* }
		)?
	) => {
		$(#[$iattr])*
		$ivis trait $instance: $crate::Decorator + $crate::Family<Item = $item> {
			$($ibody)*
		}

		impl<T: $crate::Decorator + $crate::Family<Item = $item>> $instance for T {}

		$(
			$(#[$cattr])*
			$cvis trait $class: $crate::Family<Item = $item> {
				$($cbody)*
			}

			impl<T: $crate::Family<Item = $item>> $class for T {}
		)?

		impl $crate::Install for $item {
			fn installer() -> $crate::Installer {
				$crate::Installer::new(
					<$item as $crate::Named>::id(),
					stringify!($instance),
					$crate::__class_bundle!($($class)?),
				)
			}
		}

		$crate::inventory::submit! {
			$crate::InstallerReg(<$item as $crate::Install>::installer)
		}
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __class_bundle {
	() => {
		None
	};
	($class:ident) => {
		Some(stringify!($class))
	};
}
