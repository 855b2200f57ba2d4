use std::process::ExitCode;

use devmem::{
    cli::Invocation,
    soc::access::{AccessorResult, MemoryAccessor, WriteBack},
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let invocation = match Invocation::from_args(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(err) => {
            err.report();
            return ExitCode::from(err.exit_code());
        }
    };

    match run(&invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

fn run(invocation: &Invocation) -> AccessorResult<()> {
    let request = invocation.request;
    let mut accessor = MemoryAccessor::open_target(&invocation.device, request.address)?;

    let offset = accessor.offset_of(request.address, request.width)?;
    let result = accessor.execute(&request)?;
    let virt = accessor.device().virtual_address(offset).unwrap_or(std::ptr::null());
    println!("Value at address {:#x} ({virt:p}): {:#x}", request.address, result.read);
    if let Some(WriteBack { written, readback }) = result.write {
        println!("Wrote {written:#x}; readback {readback:#x}");
    }

    accessor.close_target()
}
