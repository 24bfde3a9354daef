//! Verilog rendition of the breathing LED for the iCE40 toolchain.
//!
//! The module has no reset; the register initializers give the all-zero
//! power-up state the bitstream loads.

use std::{
    fmt::Arguments,
    io::{self, Write},
};

use crate::breathe::{RAMP_TURN_DOWN, RAMP_TURN_UP, RAMP_WIDTH, SUBCOUNT_WIDTH};

pub const MODULE_NAME: &str = "breathe";
pub const CLK_PORT: &str = "clk_i";
pub const LED_PORT: &str = "led_o";

const TAB: &str = "    ";

struct Buffer<W> {
    inner: W,
    tab: u8,
}

impl<W: Write> Buffer<W> {
    fn new(inner: W) -> Self {
        Self { inner, tab: 0 }
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.inner.write_all(s.as_bytes())
    }

    #[inline]
    fn write_eol(&mut self) -> io::Result<()> {
        self.write_str("\n")
    }

    fn push_tab(&mut self) {
        self.tab += 1;
    }

    fn pop_tab(&mut self) {
        self.tab = self.tab.saturating_sub(1);
    }

    fn write_template(&mut self, template: Arguments<'_>) -> io::Result<()> {
        for line in template.to_string().trim().lines() {
            if !line.is_empty() {
                for _ in 0 .. self.tab {
                    self.write_str(TAB)?;
                }
                self.write_str(line)?;
            }
            self.write_eol()?;
        }

        Ok(())
    }
}

pub fn write_verilog(out: impl Write) -> io::Result<()> {
    let mut buffer = Buffer::new(out);

    let ramp_msb = RAMP_WIDTH - 1;
    let wide = RAMP_WIDTH + 1;
    let sub_msb = SUBCOUNT_WIDTH - 1;
    let level_lsb = RAMP_WIDTH - SUBCOUNT_WIDTH;

    buffer.write_template(format_args!(
        "
module {MODULE_NAME}
(
    // Inputs
    input wire {CLK_PORT},
    // Outputs
    output wire {LED_PORT}
);
"
    ))?;
    buffer.write_eol()?;

    buffer.push_tab();
    buffer.write_template(format_args!(
        "
reg [{ramp_msb}:0] ramp = {RAMP_WIDTH}'d0;
reg signed [1:0] delta = 2'sd0;
reg [{sub_msb}:0] subcount = {SUBCOUNT_WIDTH}'d0;

wire signed [{RAMP_WIDTH}:0] ramp_wide = $signed({{1'b0, ramp}});
wire signed [{RAMP_WIDTH}:0] stepped = ramp_wide + delta;
"
    ))?;
    buffer.write_eol()?;

    buffer.write_template(format_args!(
        "
always @(posedge {CLK_PORT}) begin
    if (ramp == {RAMP_WIDTH}'d{RAMP_TURN_UP}) begin
        ramp <= stepped[{ramp_msb}:0];
        delta <= 2'sd1;
    end else if (ramp_wide == {wide}'sd{RAMP_TURN_DOWN}) begin
        ramp <= stepped[{ramp_msb}:0];
        delta <= -2'sd1;
    end else if (delta == 2'sd0) begin
        ramp <= {RAMP_WIDTH}'d{RAMP_TURN_UP};
        delta <= 2'sd1;
    end else begin
        ramp <= stepped[{ramp_msb}:0];
    end
end
"
    ))?;
    buffer.write_eol()?;

    buffer.write_template(format_args!(
        "
always @(posedge {CLK_PORT})
    subcount <= subcount + {SUBCOUNT_WIDTH}'d1;

assign {LED_PORT} = subcount < ramp[{ramp_msb}:{level_lsb}];
"
    ))?;
    buffer.pop_tab();

    buffer.write_str("endmodule\n")?;
    buffer.inner.flush()
}
