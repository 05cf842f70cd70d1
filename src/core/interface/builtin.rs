//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! Bus interface definitions compiled into the binary. Signal directions are
//! relative to the master side. User files under the interface search paths
//! use the same schema and may shadow these by name.

pub const BUILTIN_DEFINITIONS: [&str; 4] = [AXI4_STREAM, AXI4_LITE, AXI4, WISHBONE];

const AXI4_STREAM: &str = r#"
name: AXI4Stream
prefixes: [axis, s_axis, m_axis]
signals:
  - { name: TDATA,  regexp: tdata,  direction: out, required: true }
  - { name: TVALID, regexp: tvalid, direction: out, required: true }
  - { name: TREADY, regexp: tready, direction: in,  required: true }
  - { name: TLAST,  regexp: tlast,  direction: out }
  - { name: TKEEP,  regexp: tkeep,  direction: out }
  - { name: TSTRB,  regexp: tstrb,  direction: out }
  - { name: TUSER,  regexp: tuser,  direction: out }
  - { name: TID,    regexp: tid,    direction: out }
  - { name: TDEST,  regexp: tdest,  direction: out }
"#;

const AXI4_LITE: &str = r#"
name: AXI4Lite
prefixes: [axi, axil, s_axi, m_axi]
signals:
  - { name: AWADDR,  regexp: awaddr,  direction: out, required: true }
  - { name: AWPROT,  regexp: awprot,  direction: out }
  - { name: AWVALID, regexp: awvalid, direction: out, required: true }
  - { name: AWREADY, regexp: awready, direction: in,  required: true }
  - { name: WDATA,   regexp: wdata,   direction: out, required: true }
  - { name: WSTRB,   regexp: wstrb,   direction: out }
  - { name: WVALID,  regexp: wvalid,  direction: out, required: true }
  - { name: WREADY,  regexp: wready,  direction: in,  required: true }
  - { name: BRESP,   regexp: bresp,   direction: in }
  - { name: BVALID,  regexp: bvalid,  direction: in,  required: true }
  - { name: BREADY,  regexp: bready,  direction: out, required: true }
  - { name: ARADDR,  regexp: araddr,  direction: out, required: true }
  - { name: ARPROT,  regexp: arprot,  direction: out }
  - { name: ARVALID, regexp: arvalid, direction: out, required: true }
  - { name: ARREADY, regexp: arready, direction: in,  required: true }
  - { name: RDATA,   regexp: rdata,   direction: in,  required: true }
  - { name: RRESP,   regexp: rresp,   direction: in }
  - { name: RVALID,  regexp: rvalid,  direction: in,  required: true }
  - { name: RREADY,  regexp: rready,  direction: out, required: true }
"#;

const AXI4: &str = r#"
name: AXI4
prefixes: [axi, s_axi, m_axi]
signals:
  - { name: AWID,    regexp: awid,    direction: out }
  - { name: AWADDR,  regexp: awaddr,  direction: out, required: true }
  - { name: AWLEN,   regexp: awlen,   direction: out, required: true }
  - { name: AWSIZE,  regexp: awsize,  direction: out, required: true }
  - { name: AWBURST, regexp: awburst, direction: out, required: true }
  - { name: AWLOCK,  regexp: awlock,  direction: out }
  - { name: AWCACHE, regexp: awcache, direction: out }
  - { name: AWPROT,  regexp: awprot,  direction: out }
  - { name: AWQOS,   regexp: awqos,   direction: out }
  - { name: AWVALID, regexp: awvalid, direction: out, required: true }
  - { name: AWREADY, regexp: awready, direction: in,  required: true }
  - { name: WDATA,   regexp: wdata,   direction: out, required: true }
  - { name: WSTRB,   regexp: wstrb,   direction: out }
  - { name: WLAST,   regexp: wlast,   direction: out, required: true }
  - { name: WVALID,  regexp: wvalid,  direction: out, required: true }
  - { name: WREADY,  regexp: wready,  direction: in,  required: true }
  - { name: BID,     regexp: bid,     direction: in }
  - { name: BRESP,   regexp: bresp,   direction: in }
  - { name: BVALID,  regexp: bvalid,  direction: in,  required: true }
  - { name: BREADY,  regexp: bready,  direction: out, required: true }
  - { name: ARID,    regexp: arid,    direction: out }
  - { name: ARADDR,  regexp: araddr,  direction: out, required: true }
  - { name: ARLEN,   regexp: arlen,   direction: out, required: true }
  - { name: ARSIZE,  regexp: arsize,  direction: out, required: true }
  - { name: ARBURST, regexp: arburst, direction: out, required: true }
  - { name: ARLOCK,  regexp: arlock,  direction: out }
  - { name: ARCACHE, regexp: arcache, direction: out }
  - { name: ARPROT,  regexp: arprot,  direction: out }
  - { name: ARQOS,   regexp: arqos,   direction: out }
  - { name: ARVALID, regexp: arvalid, direction: out, required: true }
  - { name: ARREADY, regexp: arready, direction: in,  required: true }
  - { name: RID,     regexp: rid,     direction: in }
  - { name: RDATA,   regexp: rdata,   direction: in,  required: true }
  - { name: RRESP,   regexp: rresp,   direction: in }
  - { name: RLAST,   regexp: rlast,   direction: in,  required: true }
  - { name: RVALID,  regexp: rvalid,  direction: in,  required: true }
  - { name: RREADY,  regexp: rready,  direction: out, required: true }
"#;

const WISHBONE: &str = r#"
name: Wishbone
prefixes: [wb, wbm, wbs]
signals:
  - { name: CYC,    regexp: 'cyc(?:_o|_i)?',           direction: out, required: true }
  - { name: STB,    regexp: 'stb(?:_o|_i)?',           direction: out, required: true }
  - { name: ACK,    regexp: 'ack(?:_o|_i)?',           direction: in,  required: true }
  - { name: WE,     regexp: 'we(?:_o|_i)?',            direction: out, required: true }
  - { name: ADR,    regexp: 'adr(?:_o|_i)?',           direction: out, required: true }
  - { name: DAT_MS, regexp: 'dat(?:_w|_o|_ms|_mosi)?', direction: out, required: true }
  - { name: DAT_SM, regexp: 'dat(?:_r|_i|_sm|_miso)',  direction: in,  required: true }
  - { name: SEL,    regexp: 'sel(?:_o|_i)?',           direction: out }
  - { name: ERR,    regexp: 'err(?:_o|_i)?',           direction: in }
  - { name: RTY,    regexp: 'rty(?:_o|_i)?',           direction: in }
  - { name: STALL,  regexp: 'stall(?:_o|_i)?',         direction: in }
"#;
