use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use derive_where::derive_where;
use rustc_hash::FxHashMap;
pub use vcd::IdCode;
use vcd::{TimescaleUnit, Value, Writer as VcdWriter};

/// A value that can be dumped into a VCD waveform.
///
/// `add_vars` declares one wire per leaf, `trace` must emit changes for
/// those leaves in the same order.
pub trait Traceable {
    fn add_vars(vars: &mut TraceVars);

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy)]
enum Decl {
    Scope(&'static str),
    Wire(u32),
    EndScope,
}

/// Variable declarations collected before the VCD header is written.
#[derive(Debug, Default)]
pub struct TraceVars {
    decls: Vec<Decl>,
}

impl TraceVars {
    /// Declares a top-level value which can later be dumped with
    /// [`Tracer::trace`] under `sym`.
    pub fn add_var<T: Traceable>(mut self, sym: &'static str) -> Self {
        self.field::<T>(sym);
        self
    }

    /// Declares a named member of a composite value.
    pub fn field<T: Traceable>(&mut self, name: &'static str) {
        self.decls.push(Decl::Scope(name));
        T::add_vars(self);
        self.decls.push(Decl::EndScope);
    }

    #[inline]
    pub fn wire(&mut self, width: u32) {
        self.decls.push(Decl::Wire(width));
    }
}

fn bit_value(bit: bool) -> Value {
    if bit {
        Value::V1
    } else {
        Value::V0
    }
}

/// VCD writer for one module. Timestamps are in picoseconds, the unit of
/// [`ClockDomain::PERIOD`](crate::domain::ClockDomain::PERIOD).
#[derive_where(Debug)]
pub struct Tracer {
    roots: FxHashMap<&'static str, IdCode>,
    #[derive_where(skip)]
    vcd: VcdWriter<Box<dyn Write>>,
}

impl Tracer {
    pub fn open_vcd<P: AsRef<Path>>(
        path: P,
        vars: TraceVars,
        module: &str,
    ) -> io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Self::new(file, vars, module)
    }

    pub fn new(writer: impl Write + 'static, vars: TraceVars, module: &str) -> io::Result<Self> {
        let mut vcd = VcdWriter::new(Box::new(writer) as Box<dyn Write>);
        vcd.timescale(1, TimescaleUnit::PS)?;
        vcd.add_module(module)?;

        let mut roots = FxHashMap::default();
        let mut path: Vec<&'static str> = Vec::with_capacity(4);
        for decl in vars.decls {
            match decl {
                Decl::Scope(name) => path.push(name),
                Decl::Wire(width) => {
                    let id = vcd.add_wire(width, &path.join("_"))?;
                    if let Some(root) = path.first() {
                        roots.entry(*root).or_insert(id);
                    }
                }
                Decl::EndScope => {
                    path.pop();
                }
            }
        }

        vcd.upscope()?;
        vcd.enddefinitions()?;

        Ok(Self { roots, vcd })
    }

    pub fn dump_time(&mut self, ps: u64) -> io::Result<()> {
        self.vcd.timestamp(ps)
    }

    /// Dumps `value` under a symbol declared with [`TraceVars::add_var`].
    /// Unknown symbols are ignored.
    pub fn trace<T: Traceable>(&mut self, sym: &str, value: &T) -> io::Result<()> {
        match self.roots.get(sym).copied() {
            Some(mut id) => value.trace(&mut id, self),
            None => Ok(()),
        }
    }

    pub fn change_bit(&mut self, id: &mut IdCode, bit: bool) -> io::Result<()> {
        self.vcd.change_scalar(*id, bit_value(bit))?;
        *id = id.next();

        Ok(())
    }

    /// Changes a multi-bit wire, most significant bit first.
    pub fn change_bits(
        &mut self,
        id: &mut IdCode,
        bits: impl IntoIterator<Item = bool>,
    ) -> io::Result<()> {
        self.vcd.change_vector(*id, bits.into_iter().map(bit_value))?;
        *id = id.next();

        Ok(())
    }

    #[inline]
    pub fn flush(&mut self) -> io::Result<()> {
        self.vcd.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{bit::Bit, unsigned::Unsigned};

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Pair {
        a: Bit,
        b: Unsigned<3>,
    }

    impl Traceable for Pair {
        fn add_vars(vars: &mut TraceVars) {
            vars.field::<Bit>("a");
            vars.field::<Unsigned<3>>("b");
        }

        fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
            self.a.trace(id, tracer)?;
            self.b.trace(id, tracer)
        }
    }

    #[test]
    fn nested_names_and_changes() {
        let out = Shared::default();
        let vars = TraceVars::default().add_var::<Pair>("pair");
        let mut tracer = Tracer::new(out.clone(), vars, "top").unwrap();

        tracer.dump_time(0).unwrap();
        tracer
            .trace("pair", &Pair {
                a: Bit::from(true),
                b: Unsigned::<3>::from_masked(5),
            })
            .unwrap();
        tracer.trace("missing", &Bit::from(false)).unwrap();
        tracer.flush().unwrap();

        let vcd = String::from_utf8(out.0.borrow().clone()).unwrap();
        assert!(vcd.contains("$timescale 1 ps $end"));
        assert!(vcd.contains("$scope module top $end"));
        assert!(vcd.contains("pair_a $end"));
        assert!(vcd.contains("3 \" pair_b $end"));
        assert!(vcd.contains("#0"));
        assert!(vcd.contains("b101 \""));
    }
}
