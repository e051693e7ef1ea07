//! Result files used across integration tests.

use std::fs;
use std::path::{Path, PathBuf};

/// Wrapped document: 4 cases, 1 failed, 1 skipped with a reason.
pub const MIXED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites tests="4" failures="1" disabled="0" errors="0" time="0.42" timestamp="2024-05-01T10:00:00" name="AllTests">
  <testsuite name="Net" tests="2" failures="1" time="0.3" timestamp="2024-05-01T10:00:00">
    <testcase name="Connect" classname="Net" time="0.1"/>
    <testcase name="Timeout" classname="Net" time="0.2">
      <failure message="net.cpp:42"><![CDATA[Expected: 1
  Actual: 2]]></failure>
    </testcase>
  </testsuite>
  <testsuite name="Disk" tests="2" failures="0" time="0.12" timestamp="2024-05-01T10:00:01">
    <testcase name="Read" classname="Disk" time="0.12"/>
    <testcase name="Write" classname="Disk" time="0">
      <skipped message="needs root"/>
    </testcase>
  </testsuite>
</testsuites>
"#;

/// Bare `<testsuite>` root: 2 passing cases, earlier timestamp.
pub const PASSING: &str = r#"<?xml version="1.0"?>
<testsuite name="Math" tests="2" failures="0" time="0.01" timestamp="2024-04-30T08:30:00">
  <testcase name="Add" classname="Math" time="0.005"/>
  <testcase name="Sub" classname="Math" time="0.005"/>
</testsuite>
"#;

/// One case skipped without a reason.
pub const SKIP_ONLY: &str = r#"<testsuite name="Gpu" tests="1" failures="0" time="0">
  <testcase name="Render" classname="Gpu" time="0"><skipped/></testcase>
</testsuite>
"#;

/// Another `Net` case, passing, in a separate file from [`MIXED`].
pub const NET_RETRY: &str = r#"<testsuite name="Net" tests="1" failures="0">
  <testcase name="Reconnect" classname="Net" time="0.1"/>
</testsuite>
"#;

pub const MALFORMED: &str = "<testsuites><testsuite name=\"x\">";

pub const NO_SUITE: &str = "<results><case/></results>";

/// Static-analysis report with two components.
pub const SA_REPORT: &str = r"<results>
  <message>
    <file>/work/src/para-api/net/socket.cpp</file>
    <line>10</line>
    <type>Required</type>
    <desc>[AUTOSAR Rule A7-1-1] declare const</desc>
  </message>
  <message>
    <file>/work/src/para-api/net/socket.cpp</file>
    <line>22</line>
    <type>Advisory</type>
    <desc>[AUTOSAR Rule M0-1-9] dead code</desc>
  </message>
  <message>
    <file>/work/src/para-api/disk/io.cpp</file>
    <line>5</line>
    <type>Required</type>
    <desc>[AUTOSAR Rule A7-1-1] declare const</desc>
  </message>
</results>
";

/// Write `contents` to `dir/name`, creating `dir`.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("create fixture dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}
