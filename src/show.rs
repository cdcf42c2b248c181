use std::collections::BTreeSet;

use itertools::Itertools;

/// Helper trait which can be used to display states, symbols, words and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that should be
    /// for example `q0`, for a collection of states it should be `{q0,q1}`. This is used
    /// whenever a state or symbol has to be turned into a name, for example when exporting
    /// an automaton to a record or when printing a transition table.
    fn show(&self) -> String;
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

macro_rules! impl_show_for_integers {
    ($($t:ty),*) => {
        $(
            impl Show for $t {
                fn show(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_show_for_integers!(u8, u16, u32, u64, usize, i32, i64);

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            None => "-".to_string(),
            Some(x) => x.show(),
        }
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!("\"{}\"", self.iter().map(|x| x.show()).join(""))
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show> Show for BTreeSet<S> {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().map(|x| x.show()).join(","))
    }
}
